//! In-memory adapters for project persistence.

mod repository;

pub use repository::InMemoryProjectRepository;
