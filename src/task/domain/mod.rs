//! Domain model for tasks.
//!
//! Tasks carry their own [`Revision`] counter, shared in shape with
//! projects, so that concurrent full and status-only updates cannot silently
//! overwrite each other.

mod error;
mod ids;
mod task;

pub use crate::project::domain::Revision;
pub use error::ParseTaskStatusError;
pub use ids::TaskId;
pub use task::{NewTask, PersistedTaskData, Task, TaskChanges, TaskStatus};
