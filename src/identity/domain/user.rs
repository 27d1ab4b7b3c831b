//! User account aggregate.

use super::{EmailAddress, PhoneNumber, Role, RoleSet, UserId, UserName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::fmt;

/// Encoded password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an already-encoded hash.
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Validated input for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: UserName,
    /// Unique email address.
    pub email: EmailAddress,
    /// Hash of the initial password.
    pub password_hash: PasswordHash,
    /// Optional phone number.
    pub phone: Option<PhoneNumber>,
    /// Whether the account may act.
    pub is_active: bool,
    /// Initial role set.
    pub roles: RoleSet,
}

/// Administrator edits to an existing account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountChanges {
    /// Replacement display name.
    pub name: UserName,
    /// Replacement email address.
    pub email: EmailAddress,
    /// Replacement phone number.
    pub phone: Option<PhoneNumber>,
    /// New active flag; `None` keeps the current value.
    pub is_active: Option<bool>,
    /// Replacement role set.
    pub roles: RoleSet,
}

/// Self-service edits to one's own profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    /// Replacement display name.
    pub name: UserName,
    /// Replacement email address.
    pub email: EmailAddress,
    /// Replacement phone number.
    pub phone: Option<PhoneNumber>,
}

/// User account.
///
/// Serialisation omits the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    #[serde(skip)]
    password_hash: PasswordHash,
    phone: Option<PhoneNumber>,
    is_active: bool,
    roles: RoleSet,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted display name.
    pub name: UserName,
    /// Persisted email address.
    pub email: EmailAddress,
    /// Persisted password hash.
    pub password_hash: PasswordHash,
    /// Persisted phone number.
    pub phone: Option<PhoneNumber>,
    /// Persisted active flag.
    pub is_active: bool,
    /// Persisted role set.
    pub roles: RoleSet,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last-modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new account.
    #[must_use]
    pub fn new(data: NewUser, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserId::new(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            phone: data.phone,
            is_active: data.is_active,
            roles: data.roles,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an account from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            phone: data.phone,
            is_active: data.is_active,
            roles: data.roles,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the phone number, if any.
    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// Returns whether the account may act.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the held roles.
    #[must_use]
    pub const fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns `true` when the account holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
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

    /// Applies administrator edits. Roles are replaced wholesale.
    pub fn update_account(&mut self, changes: AccountChanges, clock: &impl Clock) {
        self.name = changes.name;
        self.email = changes.email;
        self.phone = changes.phone;
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.roles = changes.roles;
        self.touch(clock);
    }

    /// Applies self-service profile edits.
    pub fn update_profile(&mut self, changes: ProfileChanges, clock: &impl Clock) {
        self.name = changes.name;
        self.email = changes.email;
        self.phone = changes.phone;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
