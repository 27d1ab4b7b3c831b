//! In-memory byte storage for tests and database-less runs.

use crate::attachment::{
    domain::StoredName,
    ports::{FileStorage, FileStorageError, FileStorageResult},
};
use crate::config::DEFAULT_UPLOAD_DIR;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Keeps uploaded bytes in a shared map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileStorage {
    files: Arc<RwLock<HashMap<StoredName, Vec<u8>>>>,
}

impl InMemoryFileStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the bytes stored under `name`.
    #[must_use]
    pub fn contents(&self, name: &StoredName) -> Option<Vec<u8>> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Returns the number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn put(&self, name: &StoredName, content: &[u8]) -> FileStorageResult<String> {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        if files.contains_key(name) {
            return Err(FileStorageError::AlreadyExists(name.clone()));
        }
        files.insert(name.clone(), content.to_vec());
        Ok(format!("{DEFAULT_UPLOAD_DIR}/{name}"))
    }

    async fn remove(&self, name: &StoredName) -> FileStorageResult<()> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        Ok(())
    }
}
