use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc::Sender, oneshot};

use crate::{ArcPath, ArcStr, fs::Fs, log::Log};
pub use data::CacheEntry;
pub use key::RequestKey;
use message::Message;

mod core;
mod data;
mod key;
mod message;
#[cfg(test)]
mod tests;

/// Session-scoped memo of API responses keyed by [`RequestKey`].
///
/// Entries never expire and are not bounded in number: they live until the
/// session ends. Repeated writes to a key replace the previous value.
///
/// # Examples
/// ```ignore
/// let cache = SessionCache::spawn(fs, log, session_dir, ArcStr::from("default")).await?;
/// cache.put(key.clone(), value).await;
/// assert!(cache.get(key).await.is_some());
/// ```
#[derive(Debug, Clone)]
pub enum SessionCache {
    /// Actor backed by a JSON session file
    Actual(Sender<Message>),
    /// Purely in-memory cache for tests
    Mock(Arc<Mutex<HashMap<RequestKey, Value>>>),
}

impl SessionCache {
    /// Opens the session `session` stored under `session_dir` and spawns its
    /// actor. Entries persisted by an earlier run of the same session are
    /// available immediately.
    pub async fn spawn(
        fs: Fs,
        log: Log,
        session_dir: ArcPath,
        session: ArcStr,
    ) -> anyhow::Result<Self> {
        let (cache, _) = core::Core::load(fs, log, session_dir, session)
            .await?
            .spawn();
        Ok(cache)
    }

    pub fn mock() -> Self {
        Self::Mock(Arc::default())
    }

    /// Looks up a cached response.
    ///
    /// A dead actor behaves like an empty cache.
    pub async fn get(&self, key: RequestKey) -> Option<Value> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender.send(Message::Get { key, tx }).await.ok()?;
                rx.await.ok().flatten()
            }
            Self::Mock(entries) => entries.lock().await.get(&key).cloned(),
        }
    }

    /// Stores a response, replacing any previous value for the key.
    pub async fn put(&self, key: RequestKey, value: Value) {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                if sender.send(Message::Put { key, value, tx }).await.is_ok() {
                    let _ = rx.await;
                }
            }
            Self::Mock(entries) => {
                entries.lock().await.insert(key, value);
            }
        }
    }

    pub async fn len(&self) -> usize {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                if sender.send(Message::Len { tx }).await.is_err() {
                    return 0;
                }
                rx.await.unwrap_or_default()
            }
            Self::Mock(entries) => entries.lock().await.len(),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every entry while keeping the session open.
    pub async fn clear(&self) {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                if sender.send(Message::Clear { tx }).await.is_ok() {
                    let _ = rx.await;
                }
            }
            Self::Mock(entries) => entries.lock().await.clear(),
        }
    }

    /// Ends the session: drops every entry and deletes the session file.
    pub async fn end_session(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::EndSession { tx })
                    .await
                    .context("Sending message to SessionCache actor")?;
                rx.await
                    .context("Awaiting response from SessionCache actor")?
            }
            Self::Mock(entries) => {
                entries.lock().await.clear();
                Ok(())
            }
        }
    }
}
