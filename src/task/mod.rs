//! Task lifecycle and status updates.
//!
//! Tasks live inside a project and must be scheduled within the project's
//! date range. A task is changed either through a full update, which
//! re-checks its dates against the (possibly new) parent project, or through
//! a narrow status update that only checks the status label. The module
//! follows hexagonal architecture:
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
