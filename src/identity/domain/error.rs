//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The user name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// The user name exceeds the 255-character storage limit.
    #[error("name may not be longer than 255 characters")]
    NameTooLong,

    /// The email address is malformed.
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    /// The email address exceeds the 255-character storage limit.
    #[error("email may not be longer than 255 characters")]
    EmailTooLong,

    /// The phone number exceeds the 20-character storage limit.
    #[error("phone may not be longer than 20 characters")]
    PhoneTooLong,
}

/// Error returned when a role label is not part of the vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(pub String);
