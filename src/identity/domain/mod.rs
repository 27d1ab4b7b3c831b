//! Domain model for users and roles.

mod contact;
mod error;
mod ids;
mod role;
mod user;

pub use contact::{EmailAddress, PhoneNumber, UserName};
pub use error::{IdentityDomainError, UnknownRoleError};
pub use ids::UserId;
pub use role::{Role, RoleSet};
pub use user::{AccountChanges, NewUser, PasswordHash, PersistedUserData, ProfileChanges, User};
