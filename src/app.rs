use std::time::Duration;

use anyhow::Context as _;

use crate::{
    ArcPath, ArcStr,
    api::ApiGateway,
    cache::SessionCache,
    config::{Config, PathOpt, StrOpt, USizeOpt},
    debounce::Debounced,
    feed::FeedController,
    fs::Fs,
    log::Log,
    net::Net,
};

const SCOPE: &str = "app";

/// Every actor of a running pricewatch instance.
///
/// Built once at startup and handed to whatever drives the feed; nothing in
/// the crate reaches for global state.
#[derive(Debug, Clone)]
pub struct Context {
    pub fs: Fs,
    pub config: Config,
    pub log: Log,
    pub net: Net,
    pub cache: SessionCache,
    pub api: ApiGateway,
}

impl Context {
    /// Loads the configuration at `config_path` and spawns all actors for the
    /// browsing session `session`.
    ///
    /// A missing or unreadable configuration file is replaced by one holding
    /// the defaults.
    pub async fn build(config_path: ArcPath, session: ArcStr) -> anyhow::Result<Self> {
        let fs = Fs::spawn();

        let config = Config::spawn(fs.clone(), config_path);
        let loaded = config.load().await;
        if loaded.is_err() {
            config.save().await.context("Writing default configuration")?;
        }

        let log = Log::spawn(
            fs.clone(),
            config.log_level().await,
            config.usize(USizeOpt::MaxAge).await,
            config.path(PathOpt::LogDir).await,
        )
        .await?;
        if let Err(e) = loaded {
            log.warn(SCOPE, format!("Using default configuration: {:#}", e));
        }
        log.collect_garbage().await;

        let net = Net::spawn(config.clone(), log.clone()).await?;
        let cache = SessionCache::spawn(
            fs.clone(),
            log.clone(),
            config.path(PathOpt::SessionDir).await,
            session.clone(),
        )
        .await?;
        let api = ApiGateway::spawn(
            net.clone(),
            cache.clone(),
            log.clone(),
            config.string(StrOpt::ApiRoot).await,
        );

        log.info(SCOPE, format!("Started session {}", session));

        Ok(Self {
            fs,
            config,
            log,
            net,
            cache,
            api,
        })
    }

    /// A context made only of mocks.
    pub fn mock() -> anyhow::Result<Self> {
        Ok(Self {
            fs: Fs::mock()?,
            config: Config::mock(Default::default()),
            log: Log::mock(),
            net: Net::mock_empty(),
            cache: SessionCache::mock(),
            api: ApiGateway::mock(),
        })
    }

    /// Spawns a feed controller over this context's gateway.
    pub fn feed(&self) -> FeedController {
        FeedController::spawn(self.api.clone(), self.log.clone())
    }

    /// Wraps `action` in a debouncer using the configured quiet period.
    pub async fn debounce<T, F, Fut>(&self, action: F) -> Debounced<T>
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = Duration::from_millis(self.config.usize(USizeOpt::DebounceMs).await as u64);
        Debounced::wrap(action, delay)
    }

    /// Ends the run, optionally discarding the session cache, and flushes
    /// the log.
    pub async fn shutdown(self, end_session: bool) -> anyhow::Result<()> {
        let ended = if end_session {
            self.log.info(SCOPE, "Ending session");
            self.cache.end_session().await
        } else {
            Ok(())
        };
        let ended = self.log.error_on_error(SCOPE, ended);
        self.log.flush().await.context("Flushing log")?;
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedOutcome, LoadMode};

    #[tokio::test]
    async fn test_mock_context_wires_feed_to_gateway() {
        let ctx = Context::mock().unwrap();
        let feed = ctx.feed();

        // Nothing is canned, so the first page fails without panicking
        assert!(matches!(
            feed.load_page(LoadMode::Replace).await,
            FeedOutcome::Failed(_)
        ));
        ctx.shutdown(true).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_uses_configured_delay() {
        let ctx = Context::mock().unwrap();
        ctx.config.set_usize(USizeOpt::DebounceMs, 50).await;

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let debounced = ctx
            .debounce(move |n: u32| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(n);
                }
            })
            .await;

        let start = tokio::time::Instant::now();
        debounced.call(1);
        assert_eq!(rx.recv().await, Some(1));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(start.elapsed() < Duration::from_millis(300));
    }
}
