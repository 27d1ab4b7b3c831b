//! Port for storing uploaded bytes.

use crate::attachment::domain::StoredName;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for file storage operations.
pub type FileStorageResult<T> = Result<T, FileStorageError>;

/// Byte storage for uploaded files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Writes `content` under `name` and returns the storage path to record,
    /// for example `uploads/<name>`.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::AlreadyExists`] when `name` is taken or
    /// [`FileStorageError::Io`] on write failure.
    async fn put(&self, name: &StoredName, content: &[u8]) -> FileStorageResult<String>;

    /// Removes the content stored under `name`. Missing content is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`FileStorageError::Io`] on removal failure.
    async fn remove(&self, name: &StoredName) -> FileStorageResult<()>;
}

/// Errors returned by file storage backends.
#[derive(Debug, Clone, Error)]
pub enum FileStorageError {
    /// Content already exists under the name.
    #[error("stored file already exists: {0}")]
    AlreadyExists(StoredName),

    /// Storage backend failure.
    #[error("file storage error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl FileStorageError {
    /// Wraps a backend failure.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
