//! Port contracts for attachment records and stored content.

pub mod repository;
pub mod storage;

pub use repository::{AttachmentRepository, AttachmentRepositoryError, AttachmentRepositoryResult};
pub use storage::{FileStorage, FileStorageError, FileStorageResult};

#[cfg(test)]
pub use storage::MockFileStorage;
