use std::{
    collections::LinkedList,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

use crate::{ArcPath, ArcStr};

/// Mock implementation of the Fs actor for testing purposes.
///
/// Every path is resolved inside a private temporary directory, so tests can
/// use absolute production-looking paths without touching the real filesystem.
/// The directory is removed once the last clone is dropped.
#[derive(Debug, Clone)]
pub struct Mock {
    temp_dir: Arc<TempDir>,
}

impl Mock {
    /// Creates a new mock rooted at a fresh temporary directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            temp_dir: Arc::new(TempDir::new()?),
        })
    }

    /// Maps `path` into the temporary directory.
    fn mock_path(&self, path: &Path) -> PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.temp_dir.path().join(relative)
    }

    /// Translates a real path back into the path space seen by callers.
    fn unmock_path(&self, path: &Path) -> ArcPath {
        match path.strip_prefix(self.temp_dir.path()) {
            Ok(relative) => ArcPath::from(Path::new("/").join(relative)),
            Err(_) => ArcPath::from(path),
        }
    }

    pub async fn read_to_string(&self, path: ArcPath) -> io::Result<String> {
        tokio::fs::read_to_string(self.mock_path(&path)).await
    }

    pub async fn write(&self, path: ArcPath, contents: ArcStr) -> io::Result<()> {
        tokio::fs::write(self.mock_path(&path), contents.as_bytes()).await
    }

    pub async fn append(&self, path: ArcPath, contents: ArcStr) -> io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.mock_path(&path))
            .await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await
    }

    pub async fn remove_file(&self, path: ArcPath) -> io::Result<()> {
        tokio::fs::remove_file(self.mock_path(&path)).await
    }

    pub async fn read_dir(&self, path: ArcPath) -> io::Result<LinkedList<ArcPath>> {
        let mut entries = LinkedList::new();
        let mut rd = tokio::fs::read_dir(self.mock_path(&path)).await?;
        while let Some(entry) = rd.next_entry().await? {
            entries.push_back(self.unmock_path(&entry.path()));
        }
        Ok(entries)
    }

    pub async fn mkdir(&self, path: ArcPath) -> io::Result<()> {
        tokio::fs::create_dir_all(self.mock_path(&path)).await
    }
}
