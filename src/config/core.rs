use anyhow::Context;

use crate::{ArcPath, ArcStr, fs::Fs};

use super::{data::Data, message::Message};

/// The core configuration actor that handles file IO and data management.
///
/// # Thread Safety
/// Owned by a single task; consumers talk to it through [`Config`](super::Config).
pub struct Core {
    /// The filesystem actor for file operations
    fs: Fs,
    /// The path to the configuration file
    path: ArcPath,
    /// The current configuration data
    data: Data,
}

impl Core {
    pub fn new(fs: Fs, path: ArcPath) -> Self {
        Self {
            fs,
            path,
            data: Data::default(),
        }
    }

    pub fn spawn(mut self) -> (super::Config, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    Message::Load { tx } => {
                        let _ = tx.send(self.load().await);
                    }
                    Message::Save { tx } => {
                        let _ = tx.send(self.save().await);
                    }
                    Message::GetPath { opt, tx } => {
                        let _ = tx.send(self.data.path(opt));
                    }
                    Message::GetLogLevel { tx } => {
                        let _ = tx.send(self.data.log_level());
                    }
                    Message::GetUSize { opt, tx } => {
                        let _ = tx.send(self.data.usize(opt));
                    }
                    Message::GetString { opt, tx } => {
                        let _ = tx.send(self.data.string(opt));
                    }
                    Message::SetPath { opt, path } => self.data.set_path(opt, path),
                    Message::SetLogLevel { level } => self.data.set_log_level(level),
                    Message::SetUSize { opt, size } => self.data.set_usize(opt, size),
                    Message::SetString { opt, value } => self.data.set_string(opt, value),
                }
            }
        });
        (super::Config::Actual(tx), handle)
    }

    /// Replaces the in-memory data with the contents of the configuration file.
    async fn load(&mut self) -> anyhow::Result<()> {
        let contents = self
            .fs
            .read_to_string(self.path.clone())
            .await
            .with_context(|| format!("Reading config file {}", self.path.display()))?;
        self.data = toml::from_str(&contents)
            .with_context(|| format!("Parsing config file {}", self.path.display()))?;
        Ok(())
    }

    /// Writes the in-memory data to the configuration file.
    async fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            self.fs
                .mkdir(ArcPath::from(parent))
                .await
                .context("Creating config directory")?;
        }
        let contents = toml::to_string_pretty(&self.data).context("Serializing config")?;
        self.fs
            .write(self.path.clone(), ArcStr::from(contents))
            .await
            .with_context(|| format!("Writing config file {}", self.path.display()))
    }
}
