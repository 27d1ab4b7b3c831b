//! Visibility scoping of projects and tasks.

use super::Actor;
use crate::identity::domain::UserId;
use crate::project::domain::{MemberSet, Project};
use crate::task::domain::Task;

/// Scope of records an actor may list or act upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Administrators see everything.
    Unrestricted,
    /// Other users see projects they are members of, and tasks they are
    /// assigned to, created, or whose project they are a member of.
    MemberOf(UserId),
}

impl Visibility {
    /// Derives the scope from the actor's roles.
    #[must_use]
    pub fn for_actor(actor: &Actor) -> Self {
        if actor.is_admin() {
            Self::Unrestricted
        } else {
            Self::MemberOf(actor.user_id())
        }
    }

    /// Returns `true` when the project is in scope.
    #[must_use]
    pub fn admits_project(self, project: &Project) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::MemberOf(user) => project.is_member(user),
        }
    }

    /// Returns `true` when the task is in scope given its parent project's
    /// members.
    #[must_use]
    pub fn admits_task(self, task: &Task, project_members: &MemberSet) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::MemberOf(user) => {
                task.assigned_to() == user
                    || task.created_by() == user
                    || project_members.contains(user)
            }
        }
    }
}
