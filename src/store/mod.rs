//! Storage backends shared by every bounded context.
//!
//! Projects, tasks, users and attachments reference each other, so the
//! per-context repositories share one backing store: rules such as "deleting
//! a project deletes its tasks" or "a task is visible to members of its
//! project" are resolved inside the store rather than across repositories.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryDatabase, StorePoisoned};
