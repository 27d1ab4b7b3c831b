//! In-memory store shared by the in-memory repository adapters.

use crate::attachment::domain::{Attachment, AttachmentId};
use crate::identity::domain::{User, UserId};
use crate::project::domain::{MemberSet, Project, ProjectId};
use crate::task::domain::{Task, TaskId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Error raised when a writer panicked while holding the store lock.
#[derive(Debug, Clone, Error)]
#[error("in-memory store lock poisoned: {0}")]
pub struct StorePoisoned(String);

/// Thread-safe in-memory database.
///
/// Cloning is cheap and every clone sees the same tables. Hand one clone to
/// each `InMemory*Repository` so cross-table rules hold.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) projects: HashMap<ProjectId, Project>,
    pub(crate) tasks: HashMap<TaskId, Task>,
    pub(crate) attachments: HashMap<AttachmentId, Attachment>,
}

impl InMemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorePoisoned> {
        self.tables
            .read()
            .map_err(|err| StorePoisoned(err.to_string()))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorePoisoned> {
        self.tables
            .write()
            .map_err(|err| StorePoisoned(err.to_string()))
    }
}

impl Tables {
    /// Returns the members of a task's project, or `None` when the project
    /// is gone.
    pub(crate) fn project_members_of(&self, task: &Task) -> Option<&MemberSet> {
        self.projects.get(&task.project_id()).map(Project::members)
    }
}

/// Sorts records oldest first, breaking timestamp ties by identifier.
pub(crate) fn sort_oldest_first<T, K: Ord>(records: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, K)) {
    records.sort_by_key(key);
}
