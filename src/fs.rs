use std::{collections::LinkedList, io};

use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcPath, ArcStr};
use message::Message;

mod core;
mod message;
mod mock;

/// The fs actor is responsible for handling filesystem operations.
///
/// This enum represents either a real filesystem actor or a mock implementation
/// for testing purposes. It provides a unified interface for filesystem operations
/// regardless of the underlying implementation.
///
/// # Examples
/// ```ignore
/// let fs = Fs::spawn();
/// fs.write(path.clone(), ArcStr::from("hello")).await?;
/// let text = fs.read_to_string(path).await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender or the mock handle.
#[derive(Debug, Clone)]
pub enum Fs {
    /// A real filesystem actor that interacts with the system
    Actual(Sender<Message>),
    /// A mock rooted at a temporary directory
    Mock(mock::Mock),
}

/// Converts a dead actor into an IO error so callers can propagate it.
fn actor_died<E>(_: E) -> io::Error {
    io::Error::other("fs actor died")
}

impl Fs {
    /// Spawns a new filesystem actor.
    pub fn spawn() -> Self {
        let (fs, _) = core::Core::new().spawn();
        fs
    }

    /// Creates a mock filesystem backed by a temporary directory.
    pub fn mock() -> io::Result<Self> {
        Ok(Self::Mock(mock::Mock::new()?))
    }

    /// Reads a whole file into a string.
    pub async fn read_to_string(&self, path: ArcPath) -> io::Result<String> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::ReadToString { tx, path })
                    .await
                    .map_err(actor_died)?;
                rx.await.map_err(actor_died)?
            }
            Self::Mock(mock) => mock.read_to_string(path).await,
        }
    }

    /// Replaces the contents of a file, creating it when it does not exist.
    pub async fn write(&self, path: ArcPath, contents: ArcStr) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Write { tx, path, contents })
                    .await
                    .map_err(actor_died)?;
                rx.await.map_err(actor_died)?
            }
            Self::Mock(mock) => mock.write(path, contents).await,
        }
    }

    /// Appends to a file, creating it when it does not exist.
    pub async fn append(&self, path: ArcPath, contents: ArcStr) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Append { tx, path, contents })
                    .await
                    .map_err(actor_died)?;
                rx.await.map_err(actor_died)?
            }
            Self::Mock(mock) => mock.append(path, contents).await,
        }
    }

    /// Removes a file from the filesystem.
    pub async fn remove_file(&self, path: ArcPath) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::RemoveFile { tx, path })
                    .await
                    .map_err(actor_died)?;
                rx.await.map_err(actor_died)?
            }
            Self::Mock(mock) => mock.remove_file(path).await,
        }
    }

    /// Lists the entries of a directory.
    pub async fn read_dir(&self, path: ArcPath) -> io::Result<LinkedList<ArcPath>> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::ReadDir { tx, path })
                    .await
                    .map_err(actor_died)?;
                rx.await.map_err(actor_died)?
            }
            Self::Mock(mock) => mock.read_dir(path).await,
        }
    }

    /// Creates a directory and all of its parents.
    pub async fn mkdir(&self, path: ArcPath) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::MkDir { tx, path })
                    .await
                    .map_err(actor_died)?;
                rx.await.map_err(actor_died)?
            }
            Self::Mock(mock) => mock.mkdir(path).await,
        }
    }
}
