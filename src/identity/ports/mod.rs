//! Port contracts for the identity store.
//!
//! Ports define infrastructure-agnostic interfaces used by identity services.

pub mod password;
pub mod repository;

pub use password::{PasswordHashError, PasswordHasher};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};

#[cfg(test)]
pub use password::MockPasswordHasher;
