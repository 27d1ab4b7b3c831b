//! File attachments linked to projects or tasks.
//!
//! Uploaded content is checked against a small set of document and image
//! kinds, written to storage under a generated collision-resistant name, and
//! recorded with its original name, size, detected mime type and SHA-256
//! checksum. The owner reference is polymorphic: an attachment belongs to
//! either a project or a task. Deleting the owner leaves attachment records
//! untouched. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
