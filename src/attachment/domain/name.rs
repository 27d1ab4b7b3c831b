//! Generated storage names.

use super::FileKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Name under which uploaded bytes are stored: `<uuid-v4>.<extension>`.
///
/// The name never derives from user input beyond a validated extension, so
/// it cannot collide with or escape from other stored files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredName(String);

impl StoredName {
    /// Generates a fresh name for content of `kind`.
    ///
    /// The original name's extension is kept (lowercased) when it is
    /// conventional for the detected kind; otherwise the kind's canonical
    /// extension is used.
    #[must_use]
    pub fn generate(kind: FileKind, original_name: &str) -> Self {
        let extension = original_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| kind.accepts_extension(ext))
            .unwrap_or_else(|| kind.canonical_extension().to_owned());
        Self(format!("{}.{extension}", Uuid::new_v4()))
    }

    /// Wraps a stored name read back from persistence.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
