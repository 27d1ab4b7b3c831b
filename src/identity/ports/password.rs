//! Port for one-way password hashing.

use crate::identity::domain::PasswordHash;
use thiserror::Error;

/// One-way password hashing contract.
///
/// Hashing is CPU-bound and synchronous; services call it directly.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hash`] when the hashing backend fails.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Checks a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` for a well-formed hash that does not match.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::InvalidHash`] when the stored hash cannot
    /// be parsed.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}

/// Errors returned by password hashing backends.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordHashError {
    /// The backend failed to produce a hash.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// A stored hash is not in a recognised format.
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}
