//! Optimistic concurrency counter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic revision of a persisted aggregate.
///
/// Starts at 1 and increases by one on every persisted change. Writers send
/// the revision they read; a store holding a different revision rejects the
/// write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Revision of a freshly created aggregate.
    pub const INITIAL: Self = Self(1);

    /// Wraps a stored revision value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the following revision.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the raw revision number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
