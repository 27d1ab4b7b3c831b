//! Unit tests for the identity store.

mod service_tests;
