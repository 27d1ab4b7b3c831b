//! Domain model for projects.

mod error;
mod ids;
mod members;
mod project;
mod revision;
mod status;

pub use error::{ParseProjectStatusError, ProjectDomainError};
pub use ids::ProjectId;
pub use members::MemberSet;
pub use project::{NewProject, PersistedProjectData, Project, ProjectChanges};
pub use revision::Revision;
pub use status::ProjectStatus;
