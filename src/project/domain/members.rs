//! Project member sets.

use super::ProjectDomainError;
use crate::identity::domain::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Users collaborating on a project.
///
/// New and updated projects need at least one member. A persisted project
/// may end up empty when its last member's account is deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberSet(BTreeSet<UserId>);

impl MemberSet {
    /// Creates a non-empty member set, collapsing duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::NoMembers`] when `members` is empty.
    pub fn new(members: impl IntoIterator<Item = UserId>) -> Result<Self, ProjectDomainError> {
        let set: BTreeSet<_> = members.into_iter().collect();
        if set.is_empty() {
            return Err(ProjectDomainError::NoMembers);
        }
        Ok(Self(set))
    }

    /// Rebuilds a member set from storage without the non-empty check.
    #[must_use]
    pub fn from_persisted(members: impl IntoIterator<Item = UserId>) -> Self {
        Self(members.into_iter().collect())
    }

    /// Returns `true` when `user` is a member.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.0.contains(&user)
    }

    /// Iterates over member identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = UserId> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the project has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn remove(&mut self, user: UserId) -> bool {
        self.0.remove(&user)
    }
}
