//! Service layer for project lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult,
    UpdateProjectRequest,
};
