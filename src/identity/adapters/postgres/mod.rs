//! `PostgreSQL` adapters for identity persistence.

mod models;
mod repository;

pub use repository::PostgresUserRepository;
