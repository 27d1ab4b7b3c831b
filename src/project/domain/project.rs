//! Project aggregate root.

use super::{MemberSet, ProjectId, ProjectStatus, Revision};
use crate::identity::domain::UserId;
use crate::schedule::DateRange;
use crate::validation::{Description, Title};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// Validated input for a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Project title.
    pub title: Title,
    /// Project description.
    pub description: Description,
    /// Planned date range.
    pub schedule: DateRange,
    /// Initial members. The creator is not added implicitly.
    pub members: MemberSet,
    /// Creating user.
    pub created_by: UserId,
}

/// Validated full replacement of a project's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectChanges {
    /// Replacement title.
    pub title: Title,
    /// Replacement description.
    pub description: Description,
    /// Replacement date range.
    pub schedule: DateRange,
    /// Replacement status.
    pub status: ProjectStatus,
    /// Replacement member set.
    pub members: MemberSet,
}

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    id: ProjectId,
    title: Title,
    description: Description,
    #[serde(flatten)]
    schedule: DateRange,
    status: ProjectStatus,
    created_by: UserId,
    members: MemberSet,
    revision: Revision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted identifier.
    pub id: ProjectId,
    /// Persisted title.
    pub title: Title,
    /// Persisted description.
    pub description: Description,
    /// Persisted date range.
    pub schedule: DateRange,
    /// Persisted status.
    pub status: ProjectStatus,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted members.
    pub members: MemberSet,
    /// Persisted revision.
    pub revision: Revision,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a pending project at [`Revision::INITIAL`].
    #[must_use]
    pub fn new(data: NewProject, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            title: data.title,
            description: data.description,
            schedule: data.schedule,
            status: ProjectStatus::Pending,
            created_by: data.created_by,
            members: data.members,
            revision: Revision::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            schedule: data.schedule,
            status: data.status,
            created_by: data.created_by,
            members: data.members,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
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
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the member set.
    #[must_use]
    pub const fn members(&self) -> &MemberSet {
        &self.members
    }

    /// Returns `true` when `user` is a member.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(user)
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

    /// Replaces every editable field, members included, and advances the
    /// revision.
    pub fn apply(&mut self, changes: ProjectChanges, clock: &impl Clock) {
        self.title = changes.title;
        self.description = changes.description;
        self.schedule = changes.schedule;
        self.status = changes.status;
        self.members = changes.members;
        self.revision = self.revision.next();
        self.updated_at = clock.utc();
    }

    pub(crate) fn forget_member(&mut self, user: UserId) -> bool {
        self.members.remove(user)
    }
}
