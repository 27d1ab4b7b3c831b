//! Authorisation failures.

use crate::identity::domain::{Role, UserId};
use std::fmt;
use thiserror::Error;

/// Operation subject to an authorisation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Create a project.
    CreateProject,
    /// View a project.
    ViewProject,
    /// Edit a project.
    UpdateProject,
    /// Delete a project.
    DeleteProject,
    /// Create a task in a project.
    CreateTask,
    /// View a task.
    ViewTask,
    /// Edit a task.
    UpdateTask,
    /// Change only a task's status.
    UpdateTaskStatus,
    /// Delete a task.
    DeleteTask,
    /// Attach files to a project or task.
    AttachFile,
    /// Delete an attachment.
    DeleteAttachment,
}

impl Action {
    /// Returns a short snake-case label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateProject => "create_project",
            Self::ViewProject => "view_project",
            Self::UpdateProject => "update_project",
            Self::DeleteProject => "delete_project",
            Self::CreateTask => "create_task",
            Self::ViewTask => "view_task",
            Self::UpdateTask => "update_task",
            Self::UpdateTaskStatus => "update_task_status",
            Self::DeleteTask => "delete_task",
            Self::AttachFile => "attach_file",
            Self::DeleteAttachment => "delete_attachment",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refusal of an operation. Carries no field-level detail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The acting account is disabled.
    #[error("account {0} is disabled")]
    AccountDisabled(UserId),

    /// The operation requires a role the actor lacks.
    #[error("user {user_id} lacks the '{role}' role")]
    MissingRole {
        /// Acting user.
        user_id: UserId,
        /// Required role.
        role: Role,
    },

    /// The actor may not perform the action on this record.
    #[error("user {user_id} may not {action}")]
    Forbidden {
        /// Acting user.
        user_id: UserId,
        /// Refused action.
        action: Action,
    },
}
