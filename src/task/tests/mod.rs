//! Unit tests for task lifecycle.
