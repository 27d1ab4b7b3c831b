//! Repository port for task persistence and scoped listing.

use crate::access::Visibility;
use crate::pagination::{Page, PageRequest};
use crate::task::domain::{Revision, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists or [`TaskRepositoryError::MissingProject`] when its project is
    /// gone.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists a changed task if the stored revision still equals
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::RevisionConflict`] when another writer got
    /// there first.
    async fn update(&self, task: &Task, expected: Revision) -> TaskRepositoryResult<()>;

    /// Deletes a task. Attachment records owned by it are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns one page of tasks admitted by `visibility`, oldest first.
    ///
    /// Membership is evaluated against each task's parent project.
    async fn list(
        &self,
        visibility: Visibility,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>>;

    /// Returns every task admitted by `visibility`, oldest first.
    async fn list_visible(&self, visibility: Visibility) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task's project no longer exists.
    #[error("task {0} references a missing project")]
    MissingProject(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored revision differs from the one the writer read.
    #[error("task {id} was modified concurrently (expected revision {expected}, found {actual})")]
    RevisionConflict {
        /// Task being written.
        id: TaskId,
        /// Revision the writer read.
        expected: Revision,
        /// Revision currently stored.
        actual: Revision,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted task data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for TaskRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
