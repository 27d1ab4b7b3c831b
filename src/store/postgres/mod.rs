//! `PostgreSQL` plumbing shared by the Diesel repository adapters.
//!
//! The table definitions live in [`schema`]; the matching SQL is under
//! `migrations/` at the repository root.

pub(crate) mod blocking;
mod pool;
pub mod schema;

pub use pool::{WorkboardPgPool, build_pool};
