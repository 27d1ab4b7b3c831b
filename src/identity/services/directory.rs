//! Account administration, self-service profile edits and credential checks.

use crate::access::{AccessError, Actor, policy};
use crate::identity::{
    domain::{
        AccountChanges, EmailAddress, NewUser, PhoneNumber, ProfileChanges, Role, RoleSet, User,
        UserId, UserName,
    },
    ports::{PasswordHashError, PasswordHasher, UserRepository, UserRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use crate::validation::FieldErrors;
use mockable::Clock;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Input for creating an account.
#[derive(Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Repeated password.
    pub password_confirmation: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Active flag; defaults to `true`.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Role labels; at least one is required.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .field("is_active", &self.is_active)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Administrator edits to an account.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// New active flag; `None` keeps the current value.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Replacement role labels; `None` clears every role.
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// Self-service profile edits.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// Submitted fields failed validation.
    #[error(transparent)]
    Validation(FieldErrors),
    /// The actor may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// The account does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),
    /// Administrators may not delete their own account.
    #[error("you cannot delete your own account")]
    SelfDeletion(UserId),
    /// The account still created or is assigned projects or tasks.
    #[error("user {0} still owns or is assigned projects or tasks")]
    StillReferenced(UserId),
    /// Email or password did not match an active account.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordHashError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(UserRepositoryError),
}

impl From<UserRepositoryError> for UserDirectoryError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateEmail(_) => Self::Validation(email_taken()),
            UserRepositoryError::NotFound(id) => Self::NotFound(id),
            UserRepositoryError::StillReferenced(id) => Self::StillReferenced(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for account operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// Account administration service.
#[derive(Clone)]
pub struct UserDirectoryService<U, H, C>
where
    U: UserRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    hasher: Arc<H>,
    clock: Arc<C>,
}

impl<U, H, C> UserDirectoryService<U, H, C>
where
    U: UserRepository,
    H: PasswordHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(users: Arc<U>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    /// Lists accounts whose name or email contains `search`.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Access`] unless the actor is an active
    /// administrator.
    pub async fn list(
        &self,
        actor: &Actor,
        search: Option<&str>,
        page: PageRequest,
    ) -> UserDirectoryResult<Page<User>> {
        require_admin(actor)?;
        let term = search.map(str::trim).filter(|term| !term.is_empty());
        Ok(self.users.search(term, page).await?)
    }

    /// Returns one account.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Access`] for non-administrators and
    /// [`UserDirectoryError::NotFound`] for unknown identifiers.
    pub async fn show(&self, actor: &Actor, id: UserId) -> UserDirectoryResult<User> {
        require_admin(actor)?;
        self.load(id).await
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Access`] for non-administrators and
    /// [`UserDirectoryError::Validation`] for invalid or duplicate input.
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateUserRequest,
    ) -> UserDirectoryResult<User> {
        require_admin(actor)?;

        let mut errors = FieldErrors::new();
        let contact = ContactFields::parse(&mut errors, request.name, request.email, request.phone);
        check_password(&mut errors, &request.password, &request.password_confirmation);
        let roles = parse_required_roles(&mut errors, &request.roles);
        if let Some(email) = contact.email.as_ref()
            && self.users.find_by_email(email).await?.is_some()
        {
            errors.merge(email_taken());
        }

        let (Some((name, email, phone)), Some(roles)) = (contact.complete(), roles) else {
            return Err(reject(errors));
        };
        if !errors.is_empty() {
            return Err(reject(errors));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(
            NewUser {
                name,
                email,
                password_hash,
                phone,
                is_active: request.is_active.unwrap_or(true),
                roles,
            },
            &*self.clock,
        );
        self.users.store(&user).await?;
        info!(actor = %actor.user_id(), user_id = %user.id(), "user created");
        Ok(user)
    }

    /// Applies administrator edits. Absent roles clear the role set.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Access`] for non-administrators,
    /// [`UserDirectoryError::NotFound`] for unknown identifiers and
    /// [`UserDirectoryError::Validation`] for invalid input.
    pub async fn update(
        &self,
        actor: &Actor,
        id: UserId,
        request: UpdateUserRequest,
    ) -> UserDirectoryResult<User> {
        require_admin(actor)?;
        let mut user = self.load(id).await?;

        let mut errors = FieldErrors::new();
        let contact = ContactFields::parse(&mut errors, request.name, request.email, request.phone);
        let roles = errors.capture(
            "roles",
            RoleSet::from_labels(request.roles.unwrap_or_default()),
        );
        self.check_email_free(&mut errors, contact.email.as_ref(), id)
            .await?;

        let (Some((name, email, phone)), Some(roles)) = (contact.complete(), roles) else {
            return Err(reject(errors));
        };
        if !errors.is_empty() {
            return Err(reject(errors));
        }

        user.update_account(
            AccountChanges {
                name,
                email,
                phone,
                is_active: request.is_active,
                roles,
            },
            &*self.clock,
        );
        self.users.update(&user).await?;
        info!(actor = %actor.user_id(), user_id = %id, "user updated");
        Ok(user)
    }

    /// Deletes an account other than the actor's own.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::SelfDeletion`] when `id` is the actor,
    /// [`UserDirectoryError::Access`] for non-administrators,
    /// [`UserDirectoryError::NotFound`] for unknown identifiers and
    /// [`UserDirectoryError::StillReferenced`] while a project or task names
    /// the account as creator or assignee.
    pub async fn delete(&self, actor: &Actor, id: UserId) -> UserDirectoryResult<()> {
        require_admin(actor)?;
        if id == actor.user_id() {
            debug!(user_id = %id, "refused self-deletion");
            return Err(UserDirectoryError::SelfDeletion(id));
        }
        if let Err(err) = self.users.delete(id).await {
            if matches!(err, UserRepositoryError::StillReferenced(_)) {
                debug!(user_id = %id, "refused deletion of a referenced user");
            }
            return Err(err.into());
        }
        info!(actor = %actor.user_id(), user_id = %id, "user deleted");
        Ok(())
    }

    /// Updates the actor's own name, email and phone.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Access`] for disabled accounts and
    /// [`UserDirectoryError::Validation`] for invalid input.
    pub async fn update_profile(
        &self,
        actor: &Actor,
        request: UpdateProfileRequest,
    ) -> UserDirectoryResult<User> {
        policy::ensure_active(actor)?;
        let mut user = self.load(actor.user_id()).await?;

        let mut errors = FieldErrors::new();
        let contact = ContactFields::parse(&mut errors, request.name, request.email, request.phone);
        self.check_email_free(&mut errors, contact.email.as_ref(), actor.user_id())
            .await?;

        let Some((name, email, phone)) = contact.complete() else {
            return Err(reject(errors));
        };
        if !errors.is_empty() {
            return Err(reject(errors));
        }

        user.update_profile(ProfileChanges { name, email, phone }, &*self.clock);
        self.users.update(&user).await?;
        info!(user_id = %user.id(), "profile updated");
        Ok(user)
    }

    /// Lists active accounts for member and assignee pickers.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Access`] for disabled accounts.
    pub async fn list_active(&self, actor: &Actor) -> UserDirectoryResult<Vec<User>> {
        policy::ensure_active(actor)?;
        Ok(self.users.list_active().await?)
    }

    /// Returns the active account matching `email` and `password`.
    ///
    /// Unknown emails, wrong passwords and disabled accounts are reported
    /// identically.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::InvalidCredentials`] on any mismatch.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> UserDirectoryResult<User> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(UserDirectoryError::InvalidCredentials);
        };
        let Some(user) = self.users.find_by_email(&address).await? else {
            debug!("credential check for unknown email");
            return Err(UserDirectoryError::InvalidCredentials);
        };
        if !self.hasher.verify(password, user.password_hash())? {
            debug!(user_id = %user.id(), "credential check with wrong password");
            return Err(UserDirectoryError::InvalidCredentials);
        }
        if !user.is_active() {
            debug!(user_id = %user.id(), "credential check for disabled account");
            return Err(UserDirectoryError::InvalidCredentials);
        }
        Ok(user)
    }

    async fn load(&self, id: UserId) -> UserDirectoryResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(UserDirectoryError::NotFound(id))
    }

    async fn check_email_free(
        &self,
        errors: &mut FieldErrors,
        email: Option<&EmailAddress>,
        owner: UserId,
    ) -> UserDirectoryResult<()> {
        if let Some(address) = email
            && let Some(existing) = self.users.find_by_email(address).await?
            && existing.id() != owner
        {
            errors.merge(email_taken());
        }
        Ok(())
    }
}

fn require_admin(actor: &Actor) -> Result<(), AccessError> {
    policy::ensure_active(actor)?;
    policy::require_role(actor, Role::Administrator).inspect_err(|_| {
        debug!(actor = %actor.user_id(), "account administration refused");
    })
}

fn reject(errors: FieldErrors) -> UserDirectoryError {
    debug!(fields = %errors, "account input rejected");
    UserDirectoryError::Validation(errors)
}

fn email_taken() -> FieldErrors {
    FieldErrors::single("email", "this email address is already in use")
}

fn check_password(errors: &mut FieldErrors, password: &str, confirmation: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("the password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    }
    if password != confirmation {
        errors.add("password", "the password confirmation does not match");
    }
}

fn parse_required_roles(errors: &mut FieldErrors, labels: &[String]) -> Option<RoleSet> {
    if labels.is_empty() {
        errors.add("roles", "select at least one role");
        return None;
    }
    errors.capture("roles", RoleSet::from_labels(labels))
}

/// Parsed name, email and phone, each `None` when invalid.
struct ContactFields {
    name: Option<UserName>,
    email: Option<EmailAddress>,
    phone: Option<Option<PhoneNumber>>,
}

impl ContactFields {
    fn parse(
        errors: &mut FieldErrors,
        name: String,
        email: String,
        phone: Option<String>,
    ) -> Self {
        Self {
            name: errors.capture("name", UserName::new(name)),
            email: errors.capture("email", EmailAddress::new(email)),
            phone: errors.capture("phone", PhoneNumber::parse_optional(phone)),
        }
    }

    fn complete(self) -> Option<(UserName, EmailAddress, Option<PhoneNumber>)> {
        Some((self.name?, self.email?, self.phone?))
    }
}
