//! Runtime configuration loaded from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `WORKBOARD_DATABASE_URL` | `PostgreSQL` connection URL | unset (no database) |
//! | `WORKBOARD_DATABASE_MAX_CONNECTIONS` | Pool size | `10` |
//! | `WORKBOARD_UPLOAD_DIR` | Directory receiving uploaded files | `uploads` |
//! | `WORKBOARD_UPLOAD_MAX_BYTES` | Largest accepted upload | `5242880` (5120 KiB) |
//!
//! A `.env` file in the working directory is read first when present.

use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use thiserror::Error;

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "WORKBOARD_DATABASE_URL";
/// Environment variable holding the pool size.
pub const DATABASE_MAX_CONNECTIONS_VAR: &str = "WORKBOARD_DATABASE_MAX_CONNECTIONS";
/// Environment variable holding the upload directory.
pub const UPLOAD_DIR_VAR: &str = "WORKBOARD_UPLOAD_DIR";
/// Environment variable holding the upload size limit in bytes.
pub const UPLOAD_MAX_BYTES_VAR: &str = "WORKBOARD_UPLOAD_MAX_BYTES";

/// Default upload directory name, also the prefix of recorded paths.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
/// Default upload size limit: 5120 KiB.
pub const DEFAULT_UPLOAD_MAX_BYTES: u64 = 5120 * 1024;
/// Longest upload directory, in characters, whose recorded paths
/// `<directory>/<uuid>.<ext>` still fit the 255-character path column.
pub const MAX_UPLOAD_DIR_CHARS: usize = 213;
/// Default database pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("{variable} must be a positive integer: {source}")]
    InvalidNumber {
        /// Offending variable.
        variable: &'static str,
        /// Parse failure.
        source: ParseIntError,
    },

    /// A variable was set to a value outside its accepted range.
    #[error("{variable} must be greater than zero")]
    Zero {
        /// Offending variable.
        variable: &'static str,
    },

    /// A variable holds a value longer than accepted.
    #[error("{variable} may not be longer than {max} characters")]
    TooLong {
        /// Offending variable.
        variable: &'static str,
        /// Limit in characters.
        max: usize,
    },
}

/// Complete crate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkboardConfig {
    /// Database settings; `None` when running on in-memory storage.
    pub database: Option<DatabaseConfig>,
    /// Upload settings.
    pub uploads: UploadConfig,
}

/// Database pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

/// Upload storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory receiving uploaded files.
    pub directory: String,
    /// Largest accepted upload in bytes.
    pub max_file_size_bytes: u64,
}

impl UploadConfig {
    /// Returns the directory without trailing slashes, as recorded in
    /// attachment paths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooLong`] when the directory exceeds
    /// [`MAX_UPLOAD_DIR_CHARS`].
    pub fn path_prefix(&self) -> Result<&str, ConfigError> {
        let prefix = self.directory.trim_end_matches('/');
        if prefix.chars().count() > MAX_UPLOAD_DIR_CHARS {
            return Err(ConfigError::TooLong {
                variable: UPLOAD_DIR_VAR,
                max: MAX_UPLOAD_DIR_CHARS,
            });
        }
        Ok(prefix)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_UPLOAD_DIR.to_owned(),
            max_file_size_bytes: DEFAULT_UPLOAD_MAX_BYTES,
        }
    }
}

impl WorkboardConfig {
    /// Loads configuration from the process environment, reading `.env`
    /// first when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a numeric variable is malformed or zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            tracing::warn!(error = %err, "ignoring unreadable .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a numeric variable is malformed or zero,
    /// or when the upload directory is too long.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database = read(DATABASE_URL_VAR)
            .map(|url| -> Result<DatabaseConfig, ConfigError> {
                let max_connections = read_positive(
                    read(DATABASE_MAX_CONNECTIONS_VAR),
                    DATABASE_MAX_CONNECTIONS_VAR,
                )?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS);
                Ok(DatabaseConfig {
                    url,
                    max_connections,
                })
            })
            .transpose()?;

        let uploads = UploadConfig {
            directory: read(UPLOAD_DIR_VAR).unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_owned()),
            max_file_size_bytes: read_positive(read(UPLOAD_MAX_BYTES_VAR), UPLOAD_MAX_BYTES_VAR)?
                .unwrap_or(DEFAULT_UPLOAD_MAX_BYTES),
        };

        uploads.path_prefix()?;
        Ok(Self { database, uploads })
    }
}

fn read_positive<T>(value: Option<String>, variable: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr<Err = ParseIntError> + PartialEq + Default,
{
    let Some(raw) = value else {
        return Ok(None);
    };
    let parsed = raw
        .trim()
        .parse::<T>()
        .map_err(|source| ConfigError::InvalidNumber { variable, source })?;
    if parsed == T::default() {
        return Err(ConfigError::Zero { variable });
    }
    Ok(Some(parsed))
}
