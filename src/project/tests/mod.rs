//! Unit tests for project lifecycle.
