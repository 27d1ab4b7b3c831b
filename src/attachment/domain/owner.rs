//! Polymorphic attachment owner reference.

use super::ParseOwnerTypeError;
use crate::project::domain::ProjectId;
use crate::task::domain::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Record an attachment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "owner_type", content = "owner_id", rename_all = "snake_case")]
pub enum AttachmentOwner {
    /// Attached to a project.
    Project(ProjectId),
    /// Attached to a task.
    Task(TaskId),
}

impl AttachmentOwner {
    /// Returns the stored owner type discriminator.
    #[must_use]
    pub const fn owner_type(self) -> &'static str {
        match self {
            Self::Project(_) => "project",
            Self::Task(_) => "task",
        }
    }

    /// Returns the owner's raw identifier.
    #[must_use]
    pub const fn owner_id(self) -> Uuid {
        match self {
            Self::Project(id) => id.into_inner(),
            Self::Task(id) => id.into_inner(),
        }
    }

    /// Rebuilds an owner from its stored discriminator and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParseOwnerTypeError`] for unknown discriminators.
    pub fn from_parts(owner_type: &str, owner_id: Uuid) -> Result<Self, ParseOwnerTypeError> {
        match owner_type {
            "project" => Ok(Self::Project(ProjectId::from_uuid(owner_id))),
            "task" => Ok(Self::Task(TaskId::from_uuid(owner_id))),
            other => Err(ParseOwnerTypeError(other.to_owned())),
        }
    }
}

impl fmt::Display for AttachmentOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.owner_type(), self.owner_id())
    }
}
