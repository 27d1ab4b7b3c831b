//! Repository port for attachment records.

use crate::attachment::domain::{Attachment, AttachmentId, AttachmentOwner};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for attachment repository operations.
pub type AttachmentRepositoryResult<T> = Result<T, AttachmentRepositoryError>;

/// Attachment record persistence contract.
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::DuplicateAttachment`] when the
    /// identifier already exists.
    async fn store(&self, attachment: &Attachment) -> AttachmentRepositoryResult<()>;

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentRepositoryError::NotFound`] when the record does
    /// not exist.
    async fn delete(&self, id: AttachmentId) -> AttachmentRepositoryResult<()>;

    /// Finds a record by identifier.
    async fn find_by_id(&self, id: AttachmentId) -> AttachmentRepositoryResult<Option<Attachment>>;

    /// Returns the records linked to `owner`, oldest first.
    async fn list_for_owner(
        &self,
        owner: AttachmentOwner,
    ) -> AttachmentRepositoryResult<Vec<Attachment>>;
}

/// Errors returned by attachment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AttachmentRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate attachment identifier: {0}")]
    DuplicateAttachment(AttachmentId),

    /// The record was not found.
    #[error("attachment not found: {0}")]
    NotFound(AttachmentId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted attachment data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AttachmentRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for AttachmentRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
