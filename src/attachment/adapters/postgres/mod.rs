//! `PostgreSQL` adapters for attachment records.

mod models;
mod repository;

pub use repository::PostgresAttachmentRepository;
