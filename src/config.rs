use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcPath, ArcStr, fs::Fs, log::LogLevel};
pub use data::{Data, PathOpt, StrOpt, USizeOpt};
use message::Message;

mod core;
mod data;
mod message;
mod mock;
#[cfg(test)]
mod tests;

/// The configuration actor that provides a thread-safe interface for configuration operations.
///
/// This enum represents either a real configuration actor backed by a TOML file
/// or a mock implementation for testing purposes.
///
/// Getters never fail: if the actor is gone the default value is returned.
///
/// # Examples
/// ```ignore
/// let config = Config::spawn(fs, config_path);
/// config.load().await?;
/// let root = config.string(StrOpt::ApiRoot).await;
/// ```
#[derive(Debug, Clone)]
pub enum Config {
    /// A real configuration actor that reads from and writes to a file
    Actual(Sender<Message>),
    /// A mock implementation for testing that stores data in memory
    Mock(mock::Mock),
}

impl Config {
    /// Creates a new configuration instance and spawns its actor.
    ///
    /// The actor starts with default values until [`Config::load`] is called.
    pub fn spawn(fs: Fs, path: ArcPath) -> Self {
        let (config, _) = core::Core::new(fs, path).spawn();
        config
    }

    /// Creates a new mock configuration instance for testing.
    pub fn mock(data: Data) -> Self {
        Self::Mock(mock::Mock::new(data))
    }

    /// Loads the configuration from the file.
    pub async fn load(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Load { tx })
                    .await
                    .context("Loading config with Config actor")?;
                rx.await
                    .context("Awaiting response for config load with Config actor")?
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Saves the current configuration to the file.
    pub async fn save(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Save { tx })
                    .await
                    .context("Saving config with Config actor")?;
                rx.await
                    .context("Awaiting response for config save with Config actor")?
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Sends a query to the actor, falling back to the default data if it died.
    async fn query<T>(
        sender: &Sender<Message>,
        make: impl FnOnce(oneshot::Sender<T>) -> Message,
        fallback: impl FnOnce(&Data) -> T,
    ) -> T {
        let (tx, rx) = oneshot::channel();
        if sender.send(make(tx)).await.is_err() {
            return fallback(&Data::default());
        }
        match rx.await {
            Ok(value) => value,
            Err(_) => fallback(&Data::default()),
        }
    }

    pub async fn path(&self, opt: PathOpt) -> ArcPath {
        match self {
            Self::Actual(sender) => {
                Self::query(sender, |tx| Message::GetPath { opt, tx }, |d| d.path(opt)).await
            }
            Self::Mock(mock) => mock.with(|d| d.path(opt)).await,
        }
    }

    pub async fn set_path(&self, opt: PathOpt, path: ArcPath) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetPath { opt, path }).await;
            }
            Self::Mock(mock) => mock.with(|d| d.set_path(opt, path)).await,
        }
    }

    pub async fn log_level(&self) -> LogLevel {
        match self {
            Self::Actual(sender) => {
                Self::query(sender, |tx| Message::GetLogLevel { tx }, Data::log_level).await
            }
            Self::Mock(mock) => mock.with(|d| d.log_level()).await,
        }
    }

    pub async fn set_log_level(&self, level: LogLevel) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetLogLevel { level }).await;
            }
            Self::Mock(mock) => mock.with(|d| d.set_log_level(level)).await,
        }
    }

    pub async fn usize(&self, opt: USizeOpt) -> usize {
        match self {
            Self::Actual(sender) => {
                Self::query(sender, |tx| Message::GetUSize { opt, tx }, |d| d.usize(opt)).await
            }
            Self::Mock(mock) => mock.with(|d| d.usize(opt)).await,
        }
    }

    pub async fn set_usize(&self, opt: USizeOpt, value: usize) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetUSize { opt, size: value }).await;
            }
            Self::Mock(mock) => mock.with(|d| d.set_usize(opt, value)).await,
        }
    }

    pub async fn string(&self, opt: StrOpt) -> ArcStr {
        match self {
            Self::Actual(sender) => {
                Self::query(sender, |tx| Message::GetString { opt, tx }, |d| d.string(opt)).await
            }
            Self::Mock(mock) => mock.with(|d| d.string(opt)).await,
        }
    }

    pub async fn set_string(&self, opt: StrOpt, value: ArcStr) {
        match self {
            Self::Actual(sender) => {
                let _ = sender.send(Message::SetString { opt, value }).await;
            }
            Self::Mock(mock) => mock.with(|d| d.set_string(opt, value)).await,
        }
    }
}
