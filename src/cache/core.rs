use std::io;

use anyhow::Context;
use tokio::{sync::mpsc, task::JoinHandle};

use super::{
    SessionCache,
    data::{SessionData, SessionFile},
    message::Message,
};
use crate::{ArcPath, ArcStr, fs::Fs, log::Log};

const SCOPE: &str = "cache";

/// Core of the session cache actor.
///
/// Owns the entries of one browsing session and mirrors them to
/// `<session_dir>/<session>.json` after every write.
#[derive(Debug)]
pub struct Core {
    fs: Fs,
    log: Log,
    /// Session file path
    path: ArcPath,
    data: SessionData,
}

impl Core {
    /// Opens the session, reloading its entries when the session file exists.
    ///
    /// An unreadable or corrupt session file is reported and the session starts
    /// empty.
    pub async fn load(
        fs: Fs,
        log: Log,
        session_dir: ArcPath,
        session: ArcStr,
    ) -> anyhow::Result<Self> {
        if session.is_empty() || session.contains(['/', '\\']) || session.starts_with('.') {
            anyhow::bail!("Invalid session id: {:?}", session);
        }

        fs.mkdir(session_dir.clone())
            .await
            .with_context(|| format!("Creating session directory {}", session_dir.display()))?;

        let path = ArcPath::from(session_dir.join(format!("{session}.json")));
        let data = match fs.read_to_string(path.clone()).await {
            Ok(text) => match serde_json::from_str::<SessionFile>(&text) {
                Ok(file) => {
                    let data = SessionData::from(file);
                    log.info(
                        SCOPE,
                        format!("Restored {} entries for session {}", data.len(), session),
                    );
                    data
                }
                Err(e) => {
                    log.warn(
                        SCOPE,
                        format!("Discarding corrupt session file {}: {}", path.display(), e),
                    );
                    SessionData::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => SessionData::default(),
            Err(e) => {
                log.warn(
                    SCOPE,
                    format!("Cannot read session file {}: {}", path.display(), e),
                );
                SessionData::default()
            }
        };

        Ok(Self {
            fs,
            log,
            path,
            data,
        })
    }

    pub fn spawn(self) -> (SessionCache, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);

        let handle = tokio::spawn(async move {
            let mut core = self;

            while let Some(message) = rx.recv().await {
                match message {
                    Message::Get { key, tx } => {
                        let _ = tx.send(core.data.get(&key));
                    }
                    Message::Put { key, value, tx } => {
                        core.data.put(key, value);
                        core.persist().await;
                        let _ = tx.send(());
                    }
                    Message::Len { tx } => {
                        let _ = tx.send(core.data.len());
                    }
                    Message::Clear { tx } => {
                        core.data.clear();
                        core.persist().await;
                        let _ = tx.send(());
                    }
                    Message::EndSession { tx } => {
                        let _ = tx.send(core.end_session().await);
                    }
                }
            }
        });

        (SessionCache::Actual(tx), handle)
    }

    /// Writes the session file. The in-memory entries stay authoritative when
    /// the write fails.
    async fn persist(&self) {
        let result = async {
            let json = serde_json::to_string(&self.data.to_file())
                .context("Serializing session cache")?;
            self.fs
                .write(self.path.clone(), ArcStr::from(json))
                .await
                .with_context(|| format!("Writing session file {}", self.path.display()))
        }
        .await;
        let _ = self.log.warn_on_error(SCOPE, result);
    }

    async fn end_session(&mut self) -> anyhow::Result<()> {
        self.data.clear();
        match self.fs.remove_file(self.path.clone()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Removing session file {}", self.path.display())),
        }
    }
}
