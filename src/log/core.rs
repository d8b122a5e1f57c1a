use anyhow::Context;
use chrono::{NaiveDateTime, Utc};
use tokio::task::JoinHandle;

use super::data::{LogLevel, LogMessage};
use super::message::Message;
use crate::{ArcPath, ArcStr, fs::Fs};

const FILE_PREFIX: &str = "pricewatch_";
const FILE_TIMESTAMP: &str = "%Y-%m-%d-%H-%M-%S";

/// The core of the logging system that manages logging to both stderr and log files.
///
/// Every message is appended to a timestamped log file and to `latest.log`.
/// Messages at or above the print level are also buffered and written to
/// stderr when the logger is flushed.
#[derive(Debug)]
pub struct Core {
    /// Filesystem interface for file operations
    fs: Fs,
    /// Directory where log files are stored
    log_dir: ArcPath,
    /// Path to the current timestamped log file
    log_path: ArcPath,
    /// Path to the "latest" log file
    latest_log_path: ArcPath,
    /// Buffer of messages to be printed to stderr
    logs_to_print: Vec<LogMessage>,
    /// Minimum level of messages to be printed to stderr
    print_level: LogLevel,
    /// Maximum age of log files in days before they are deleted
    max_age: usize,
}

impl Core {
    /// Creates the log directory and the log files for this run.
    pub async fn build(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let log_path = ArcPath::from(log_dir.join(format!(
            "{}{}.log",
            FILE_PREFIX,
            Utc::now().format(FILE_TIMESTAMP)
        )));
        let latest_log_path = ArcPath::from(log_dir.join("latest.log"));

        fs.mkdir(log_dir.clone())
            .await
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
        fs.append(log_path.clone(), ArcStr::from(""))
            .await
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;
        fs.write(latest_log_path.clone(), ArcStr::from(""))
            .await
            .with_context(|| {
                format!(
                    "Failed to create latest log file: {}",
                    latest_log_path.display()
                )
            })?;

        Ok(Self {
            fs,
            log_dir,
            log_path,
            latest_log_path,
            logs_to_print: Vec::new(),
            print_level: level,
            max_age,
        })
    }

    pub fn spawn(mut self) -> (super::Log, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Message::Log(msg) => {
                        self.log(msg).await;
                    }
                    Message::Flush => {
                        self.flush();
                        rx.close();
                        break;
                    }
                    Message::CollectGarbage => {
                        self.collect_garbage().await;
                    }
                }
            }
        });
        (super::Log::Actual(tx), handle)
    }

    async fn log(&mut self, message: LogMessage) {
        let line = ArcStr::from(format!("{}\n", &message));

        // A logger has nowhere to report its own IO failures but stderr
        if let Err(e) = self.fs.append(self.log_path.clone(), line.clone()).await {
            eprintln!("Failed to write to {}: {}", self.log_path.display(), e);
        }
        if let Err(e) = self.fs.append(self.latest_log_path.clone(), line).await {
            eprintln!("Failed to write to {}: {}", self.latest_log_path.display(), e);
        }

        if message.level >= self.print_level {
            self.logs_to_print.push(message);
        }
    }

    fn flush(self) {
        for message in &self.logs_to_print {
            eprintln!("{}", message);
        }
        if !self.logs_to_print.is_empty() {
            eprintln!("Check the full log file: {}", self.log_path.display());
        }
    }

    /// Deletes log files whose name timestamp is older than `max_age` days.
    async fn collect_garbage(&mut self) {
        if self.max_age == 0 {
            return;
        }
        let now = Utc::now().naive_utc();
        let Ok(logs) = self.fs.read_dir(self.log_dir.clone()).await else {
            self.log(LogMessage {
                level: LogLevel::Error,
                scope: "log",
                message: "Failed to read the logs directory during garbage collection".into(),
            })
            .await;
            return;
        };
        for log in logs {
            let Some(created) = log
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_log_timestamp)
            else {
                continue;
            };
            let age = (now - created).num_days();
            if age > self.max_age as i64 && self.fs.remove_file(log.clone()).await.is_err() {
                self.log(LogMessage {
                    level: LogLevel::Warning,
                    scope: "log",
                    message: format!("Failed to remove the log file: {}", log.display()),
                })
                .await;
            }
        }
    }
}

/// Extracts the creation time from a `pricewatch_<timestamp>.log` file name.
fn parse_log_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let stamp = filename.strip_prefix(FILE_PREFIX)?.strip_suffix(".log")?;
    NaiveDateTime::parse_from_str(stamp, FILE_TIMESTAMP).ok()
}
