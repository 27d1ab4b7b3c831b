//! Repository port for project persistence, membership and scoped listing.

use crate::access::Visibility;
use crate::pagination::{Page, PageRequest};
use crate::project::domain::{Project, ProjectId, Revision};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
///
/// Implementations store a project's members alongside the project and
/// replace them wholesale on update.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project with its members.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the
    /// identifier already exists.
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Persists a changed project if the stored revision still equals
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist or [`ProjectRepositoryError::RevisionConflict`] when another
    /// writer got there first.
    async fn update(&self, project: &Project, expected: Revision) -> ProjectRepositoryResult<()>;

    /// Deletes a project together with its memberships and tasks.
    ///
    /// Attachment records owned by the project are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns one page of projects admitted by `visibility`, oldest first.
    async fn list(
        &self,
        visibility: Visibility,
        page: PageRequest,
    ) -> ProjectRepositoryResult<Page<Project>>;

    /// Returns every project admitted by `visibility`, oldest first.
    async fn list_visible(&self, visibility: Visibility) -> ProjectRepositoryResult<Vec<Project>>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The stored revision differs from the one the writer read.
    #[error("project {id} was modified concurrently (expected revision {expected}, found {actual})")]
    RevisionConflict {
        /// Project being written.
        id: ProjectId,
        /// Revision the writer read.
        expected: Revision,
        /// Revision currently stored.
        actual: Revision,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted project data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for ProjectRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
