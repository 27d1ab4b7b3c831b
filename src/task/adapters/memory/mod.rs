//! In-memory adapters for task persistence.

mod repository;

pub use repository::InMemoryTaskRepository;
