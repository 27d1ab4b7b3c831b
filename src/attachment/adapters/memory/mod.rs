//! In-memory adapters for attachment records.

mod repository;

pub use repository::InMemoryAttachmentRepository;
