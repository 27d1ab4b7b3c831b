//! Unit tests for attachment linkage.
