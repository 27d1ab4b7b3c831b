//! Project lifecycle and membership.
//!
//! A project spans a [`DateRange`](crate::schedule::DateRange), holds a
//! status from a four-label vocabulary and a non-empty set of member users.
//! Status transitions are unrestricted: any label may follow any other.
//! Deleting a project removes its tasks and memberships but leaves its
//! attachment records in place. The module follows hexagonal architecture:
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
