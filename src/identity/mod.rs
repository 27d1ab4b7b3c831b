//! Identity and role store.
//!
//! Users carry an `is_active` flag and a set of role labels stored directly
//! on the user record. Role labels come from a closed vocabulary and are
//! checked at every write boundary. Administrators manage accounts; every
//! user may edit their own profile but never delete their own account. The
//! module follows hexagonal architecture:
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
