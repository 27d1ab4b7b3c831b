//! User context, visibility scoping and authorisation policies.
//!
//! Every service operation receives an explicit [`Actor`] instead of looking
//! up an ambient current user. [`Visibility`] decides which projects and
//! tasks an actor may list or act upon; the functions in [`policy`] decide
//! which mutations they may perform. Both are pure and evaluated afresh on
//! every call.

mod actor;
mod error;
pub mod policy;
mod visibility;

pub use actor::Actor;
pub use error::{AccessError, Action};
pub use visibility::Visibility;
