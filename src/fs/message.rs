use std::{collections::LinkedList, io};

use tokio::sync::oneshot;

use crate::{ArcPath, ArcStr};

/// Messages that can be sent to a [`Fs`](super::Fs) actor.
///
/// This enum defines the different types of filesystem operations that can be performed
/// through the actor system.
#[derive(Debug)]
pub enum Message {
    /// Reads a whole file into a string
    ReadToString {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<String>>,
        /// The path of the file to read
        path: ArcPath,
    },
    /// Replaces the contents of a file, creating it if needed
    Write {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<()>>,
        /// The path of the file to write
        path: ArcPath,
        /// The new contents
        contents: ArcStr,
    },
    /// Appends to a file, creating it if needed
    Append {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<()>>,
        /// The path of the file to append to
        path: ArcPath,
        /// The contents to append
        contents: ArcStr,
    },
    /// Removes a file from the filesystem
    RemoveFile {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<()>>,
        /// The path of the file to remove
        path: ArcPath,
    },
    /// Reads the contents of a directory
    ReadDir {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<LinkedList<ArcPath>>>,
        /// The path of the directory to read
        path: ArcPath,
    },
    /// Creates a directory and its parents
    MkDir {
        /// Channel to send the result back to the caller
        tx: oneshot::Sender<io::Result<()>>,
        /// The path of the directory to create
        path: ArcPath,
    },
}
