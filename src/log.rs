use std::fmt::Display;

use tokio::{
    sync::mpsc::{Sender, error::TrySendError},
    task::JoinHandle,
};

use crate::{ArcPath, fs::Fs};
pub use data::{LogLevel, LogMessage};
use message::Message;

mod core;
mod data;
mod message;
mod mock;

/// The logging actor that provides a thread-safe interface for logging operations.
///
/// This enum represents either a real logging actor or a mock implementation
/// for testing purposes. Every message carries a scope naming the component
/// that emitted it.
///
/// # Examples
/// ```ignore
/// let log = Log::spawn(fs, LogLevel::Warning, 7, log_dir).await?;
/// log.info("app", "Starting pricewatch");
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or the mock handle.
#[derive(Debug, Clone)]
pub enum Log {
    /// A real logging actor that writes to files and stderr
    Actual(Sender<Message>),
    /// A mock that keeps messages in memory
    Mock(mock::Mock),
}

impl Log {
    /// Builds the log files for this run and spawns the actor.
    ///
    /// # Arguments
    /// * `fs` - Filesystem interface for file operations
    /// * `level` - Minimum log level for messages to be printed to stderr on flush
    /// * `max_age` - Maximum age of log files in days before they are deleted
    /// * `log_dir` - Directory where log files will be stored
    ///
    /// # Errors
    /// Returns an error if the log directory or the log files cannot be created.
    pub async fn spawn(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let (log, _) = core::Core::build(fs, level, max_age, log_dir)
            .await?
            .spawn();
        Ok(log)
    }

    /// Creates a mock logger that records messages in memory.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Sends a [`LogMessage`] to the logger without blocking the caller.
    ///
    /// Messages keep their order unless the channel is full, in which case the
    /// overflowing message is delivered from a background task.
    fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        let sender = match self {
            Log::Mock(mock) => return mock.log(scope, message, level),
            Log::Actual(sender) => sender,
        };

        let msg = Message::Log(LogMessage {
            level,
            scope,
            message,
        });
        if let Err(TrySendError::Full(msg)) = sender.try_send(msg) {
            let sender = sender.clone();
            tokio::spawn(async move {
                let _ = sender.send(msg).await;
            });
        }
    }

    /// Log a message with the `INFO` level
    pub fn info<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Info);
    }

    /// Log a message with the `WARNING` level
    pub fn warn<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Warning);
    }

    /// Log a message with the `ERROR` level
    pub fn error<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Error);
    }

    /// Log a warning if the result is an error and return the result as is
    pub fn warn_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Warning);
        }
        result
    }

    /// Log an error if the result is an error and return the result as is
    pub fn error_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Error);
        }
        result
    }

    /// Flushes the logger by printing its buffered messages to stderr and
    /// stopping the actor. Messages logged afterwards are dropped.
    pub fn flush(self) -> JoinHandle<()> {
        let Self::Actual(sender) = self else {
            return tokio::spawn(async {});
        };

        tokio::spawn(async move {
            let _ = sender.send(Message::Flush).await;
        })
    }

    /// Deletes log files older than the `max_age` given to [`Log::spawn`].
    pub async fn collect_garbage(&self) {
        let Self::Actual(sender) = self else {
            return;
        };
        let _ = sender.send(Message::CollectGarbage).await;
    }

    /// Returns the messages recorded by a mock logger, `None` for a real one.
    pub fn get_messages(&self) -> Option<Vec<LogMessage>> {
        match self {
            Self::Mock(mock) => Some(mock.messages()),
            Self::Actual(_) => None,
        }
    }
}
