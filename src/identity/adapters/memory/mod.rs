//! In-memory adapters for identity persistence.

mod repository;

pub use repository::InMemoryUserRepository;
