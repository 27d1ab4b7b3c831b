//! Acting user context.

use crate::identity::domain::{Role, RoleSet, User, UserId};

/// The user on whose behalf an operation runs.
///
/// Carries only what authorisation needs. Built by the session layer from
/// the authenticated [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    roles: RoleSet,
    is_active: bool,
}

impl Actor {
    /// Creates an actor context.
    #[must_use]
    pub const fn new(user_id: UserId, roles: RoleSet, is_active: bool) -> Self {
        Self {
            user_id,
            roles,
            is_active,
        }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the acting user's roles.
    #[must_use]
    pub const fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns whether the acting account is enabled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns `true` when the actor holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    /// Returns `true` when the actor is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.roles().clone(), user.is_active())
    }
}
