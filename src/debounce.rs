use std::{future::Future, time::Duration};

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinSet,
    time::Instant,
};

enum Command<T> {
    Call(T),
    Flush(oneshot::Sender<()>),
}

/// Rate limiter that collapses bursts of calls into one delayed action.
///
/// Every [`call`](Debounced::call) replaces the pending arguments and pushes
/// the deadline to `delay` after it, so only the last call of a burst runs.
/// The trigger can be reused indefinitely and lives as long as a handle does.
/// Dropping the last handle runs a still pending call right away.
///
/// # Examples
/// ```ignore
/// let search = Debounced::wrap(move |text: String| { ... }, Duration::from_millis(300));
/// search.call("p".into());
/// search.call("ph".into()); // only this one runs
/// ```
pub struct Debounced<T> {
    tx: mpsc::UnboundedSender<Command<T>>,
}

impl<T> Clone for Debounced<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Debounced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Debounced<T> {
    /// Wraps `action` so that it runs at most once per quiet period of `delay`.
    pub fn wrap<F, Fut>(action: F, delay: Duration) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Command<T>>();

        tokio::spawn(async move {
            let mut pending: Option<(T, Instant)> = None;
            let mut fired = JoinSet::new();

            loop {
                while fired.try_join_next().is_some() {}

                let deadline = pending.as_ref().map(|(_, deadline)| *deadline);
                let command = match deadline {
                    Some(deadline) => tokio::select! {
                        command = rx.recv() => command,
                        _ = tokio::time::sleep_until(deadline) => {
                            if let Some((args, _)) = pending.take() {
                                fired.spawn(action(args));
                            }
                            continue;
                        }
                    },
                    None => rx.recv().await,
                };

                match command {
                    Some(Command::Call(args)) => pending = Some((args, Instant::now() + delay)),
                    Some(Command::Flush(done)) => {
                        while fired.join_next().await.is_some() {}
                        if let Some((args, _)) = pending.take() {
                            action(args).await;
                        }
                        let _ = done.send(());
                    }
                    // Last handle dropped, so nothing can reschedule the pending call
                    None => {
                        if let Some((args, _)) = pending.take() {
                            action(args).await;
                        }
                        while fired.join_next().await.is_some() {}
                        break;
                    }
                }
            }
        });

        Self { tx }
    }

    /// Schedules the action with `args`, cancelling any pending invocation.
    pub fn call(&self, args: T) {
        let _ = self.tx.send(Command::Call(args));
    }

    /// Runs the pending invocation now, if any, and waits for it and for every
    /// invocation already started to finish.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(Command::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}
