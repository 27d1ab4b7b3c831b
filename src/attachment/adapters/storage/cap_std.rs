//! Filesystem storage confined to the upload directory.

use crate::attachment::{
    domain::StoredName,
    ports::{FileStorage, FileStorageError, FileStorageResult},
};
use crate::config::UploadConfig;
use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::{ErrorKind, Write};
use std::sync::Arc;

/// Stores uploads as files inside one capability-scoped directory.
///
/// Every path is resolved relative to the opened [`Dir`], so a stored name
/// cannot reach outside it.
#[derive(Debug, Clone)]
pub struct CapStdFileStorage {
    dir: Arc<Dir>,
    prefix: String,
}

impl CapStdFileStorage {
    /// Opens (creating when missing) the configured upload directory.
    ///
    /// Recorded paths are `<directory>/<stored name>`.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::Io`] when the directory is too long to
    /// record, or cannot be created or opened.
    pub fn open(config: &UploadConfig) -> FileStorageResult<Self> {
        let prefix = config.path_prefix().map_err(FileStorageError::io)?;
        let directory = config.directory.as_str();
        Dir::create_ambient_dir_all(directory, ambient_authority())
            .map_err(FileStorageError::io)?;
        let dir =
            Dir::open_ambient_dir(directory, ambient_authority()).map_err(FileStorageError::io)?;
        Ok(Self::from_dir(dir, prefix))
    }

    /// Wraps an already-open directory, recording paths under `prefix`.
    #[must_use]
    pub fn from_dir(dir: Dir, prefix: impl Into<String>) -> Self {
        Self {
            dir: Arc::new(dir),
            prefix: prefix.into(),
        }
    }

    async fn run_blocking<F, T>(&self, f: F) -> FileStorageResult<T>
    where
        F: FnOnce(&Dir) -> FileStorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || f(&dir))
            .await
            .map_err(FileStorageError::io)?
    }
}

#[async_trait]
impl FileStorage for CapStdFileStorage {
    async fn put(&self, name: &StoredName, content: &[u8]) -> FileStorageResult<String> {
        let stored_name = name.clone();
        let bytes = content.to_vec();
        self.run_blocking(move |dir| {
            let mut file = dir
                .open_with(
                    stored_name.as_str(),
                    OpenOptions::new().write(true).create_new(true),
                )
                .map_err(|err| match err.kind() {
                    ErrorKind::AlreadyExists => FileStorageError::AlreadyExists(stored_name.clone()),
                    _ => FileStorageError::io(err),
                })?;
            let written = file.write_all(&bytes).and_then(|()| file.sync_all());
            drop(file);
            discard_on_error(dir, &stored_name, written)
        })
        .await?;

        tracing::debug!(name = %name, size = content.len(), "stored upload");
        Ok(format!("{}/{}", self.prefix, name.as_str()))
    }

    async fn remove(&self, name: &StoredName) -> FileStorageResult<()> {
        let stored_name = name.clone();
        self.run_blocking(move |dir| match dir.remove_file(stored_name.as_str()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(name = %stored_name, "stored upload already absent");
                Ok(())
            }
            Err(err) => Err(FileStorageError::io(err)),
        })
        .await
    }
}

/// Removes the partially written `name` when `written` failed.
fn discard_on_error(
    dir: &Dir,
    name: &StoredName,
    written: std::io::Result<()>,
) -> FileStorageResult<()> {
    let Err(err) = written else {
        return Ok(());
    };
    if let Err(cleanup) = dir.remove_file(name.as_str()) {
        tracing::warn!(name = %name, error = %cleanup, "could not discard partial upload");
    }
    Err(FileStorageError::io(err))
}
