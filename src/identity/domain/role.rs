//! Closed role vocabulary and per-user role sets.

use super::UnknownRoleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Role a user may hold.
///
/// Each role has exactly one label, and labels are matched exactly: case,
/// accents and spacing all count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full access to every project, task and user account.
    #[serde(rename = "Administrador")]
    Administrator,
    /// May create projects and manage the projects they belong to.
    #[serde(rename = "Responsable de proyecto")]
    ProjectManager,
    /// Responsible for the tasks assigned to them.
    #[serde(rename = "Responsable de tarea")]
    TaskManager,
}

impl Role {
    /// Every role in the vocabulary.
    pub const ALL: [Self; 3] = [Self::Administrator, Self::ProjectManager, Self::TaskManager];

    /// Returns the canonical stored label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Administrator => "Administrador",
            Self::ProjectManager => "Responsable de proyecto",
            Self::TaskManager => "Responsable de tarea",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Role {
    type Error = UnknownRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|role| role.label() == value)
            .ok_or_else(|| UnknownRoleError(value.to_owned()))
    }
}

/// Unordered set of roles held by a user. May be empty.
///
/// Serialises as a JSON array of labels, which is also the stored form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses role labels, collapsing duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRoleError`] for the first label outside the
    /// vocabulary.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, UnknownRoleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| Role::try_from(label.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Returns `true` when the set holds `role`.
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Returns `true` when the set holds [`Role::Administrator`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.contains(Role::Administrator)
    }

    /// Returns `true` when no role is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the held roles in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    /// Returns the held labels in vocabulary order.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.iter().map(Role::label).collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
