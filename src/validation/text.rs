//! Validated free-text values used by projects and tasks.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum title length, matching the `VARCHAR(255)` columns.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Errors returned while constructing text values.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TextError {
    /// The value is empty after trimming.
    #[error("this field is required")]
    Required,

    /// The value exceeds its length limit.
    #[error("this field may not be longer than {max} characters")]
    TooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

/// Non-empty title of at most [`MAX_TITLE_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Creates a validated, trimmed title.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Required`] for blank input and
    /// [`TextError::TooLong`] past [`MAX_TITLE_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TextError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TextError::Required);
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(TextError::TooLong {
                max: MAX_TITLE_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty description without a length limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    /// Creates a validated description. Surrounding whitespace is kept.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Required`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TextError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(TextError::Required);
        }
        Ok(Self(raw))
    }

    /// Returns the description as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
