//! Task aggregate root and status vocabulary.

use super::{ParseTaskStatusError, Revision, TaskId};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use crate::schedule::DateRange;
use crate::validation::{Description, Title};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Pending,
    /// Work is under way.
    InProgress,
    /// Work has finished.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Validated input for a new task.
///
/// The schedule must already have been checked against the parent project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: Title,
    /// Task description.
    pub description: Description,
    /// Planned date range inside the project's range.
    pub schedule: DateRange,
    /// Parent project.
    pub project_id: ProjectId,
    /// Assigned user.
    pub assigned_to: UserId,
    /// Creating user.
    pub created_by: UserId,
}

/// Validated full replacement of a task's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Title,
    /// Replacement description.
    pub description: Description,
    /// Replacement date range.
    pub schedule: DateRange,
    /// Replacement status.
    pub status: TaskStatus,
    /// Replacement parent project.
    pub project_id: ProjectId,
    /// Replacement assignee.
    pub assigned_to: UserId,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    title: Title,
    description: Description,
    #[serde(flatten)]
    schedule: DateRange,
    status: TaskStatus,
    project_id: ProjectId,
    #[serde(rename = "assigned_user_id")]
    assigned_to: UserId,
    created_by: UserId,
    revision: Revision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: Title,
    /// Persisted description.
    pub description: Description,
    /// Persisted date range.
    pub schedule: DateRange,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted parent project.
    pub project_id: ProjectId,
    /// Persisted assignee.
    pub assigned_to: UserId,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted revision.
    pub revision: Revision,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task at [`Revision::INITIAL`].
    #[must_use]
    pub fn new(data: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            schedule: data.schedule,
            status: TaskStatus::Pending,
            project_id: data.project_id,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            revision: Revision::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            schedule: data.schedule,
            status: data.status,
            project_id: data.project_id,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    /// Returns the planned date range.
    #[must_use]
    pub const fn schedule(&self) -> DateRange {
        self.schedule
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the parent project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn assigned_to(&self) -> UserId {
        self.assigned_to
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the current revision.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces every editable field and advances the revision.
    pub fn apply(&mut self, changes: TaskChanges, clock: &impl Clock) {
        self.title = changes.title;
        self.description = changes.description;
        self.schedule = changes.schedule;
        self.status = changes.status;
        self.project_id = changes.project_id;
        self.assigned_to = changes.assigned_to;
        self.advance(clock);
    }

    /// Sets the status, advancing the revision only when it changes.
    ///
    /// Returns `false` when the task already had `status`.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.advance(clock);
        true
    }

    fn advance(&mut self, clock: &impl Clock) {
        self.revision = self.revision.next();
        self.updated_at = clock.utc();
    }
}
