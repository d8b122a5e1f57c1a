use std::{collections::LinkedList, io};

use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::mpsc};

use crate::{ArcPath, ArcStr};

use super::message::Message;

/// The core of the Fs actor, responsible for handling filesystem operations.
///
/// This struct provides access to the filesystem through an actor pattern.
/// It wraps tokio's filesystem functions so that every consumer goes through
/// a single, sequential owner of the IO.
#[derive(Debug, Default)]
pub struct Core;

impl Core {
    pub fn new() -> Self {
        Default::default()
    }

    /// Transforms the core into an actor ready to receive messages.
    pub fn spawn(self) -> (super::Fs, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                use Message::*;
                match msg {
                    ReadToString { tx, path } => {
                        let _ = tx.send(tokio::fs::read_to_string(&path).await);
                    }
                    Write { tx, path, contents } => {
                        let _ = tx.send(Self::write(path, contents, false).await);
                    }
                    Append { tx, path, contents } => {
                        let _ = tx.send(Self::write(path, contents, true).await);
                    }
                    RemoveFile { tx, path } => {
                        let _ = tx.send(tokio::fs::remove_file(&path).await);
                    }
                    ReadDir { tx, path } => {
                        let _ = tx.send(Self::read_dir(path).await);
                    }
                    MkDir { tx, path } => {
                        let _ = tx.send(tokio::fs::create_dir_all(&path).await);
                    }
                }
            }
        });
        (super::Fs::Actual(tx), handle)
    }

    /// Writes `contents` to `path`, either truncating or appending.
    async fn write(path: ArcPath, contents: ArcStr, append: bool) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(!append)
            .append(append)
            .open(&path)
            .await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await
    }

    async fn read_dir(path: ArcPath) -> io::Result<LinkedList<ArcPath>> {
        let mut rd = tokio::fs::read_dir(&path).await?;
        let mut entries = LinkedList::new();
        while let Some(entry) = rd.next_entry().await? {
            entries.push_back(ArcPath::from(entry.path()));
        }
        Ok(entries)
    }
}
