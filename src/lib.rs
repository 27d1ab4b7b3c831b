//! Workboard: project and task management core.
//!
//! This crate holds the business rules of a small project/task management
//! application: who may see and change which projects and tasks, whether a
//! task's dates fit inside its project, how statuses move, and how uploaded
//! files are linked to their owners. HTTP routing, sessions and rendering
//! live outside the crate and call the services with an explicit [`Actor`].
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`,
//!   filesystem)
//! - **Services**: Orchestration of domain rules over ports
//!
//! # Modules
//!
//! - [`identity`]: Users, closed role vocabulary, account administration
//! - [`access`]: User context, visibility scoping and authorisation policies
//! - [`schedule`]: Date ranges and the task/project containment rule
//! - [`project`]: Project lifecycle and membership
//! - [`task`]: Task lifecycle and status updates
//! - [`attachment`]: File attachments with polymorphic owners
//!
//! [`Actor`]: access::Actor

pub mod access;
pub mod attachment;
pub mod config;
pub mod identity;
pub mod pagination;
pub mod project;
pub mod schedule;
pub mod store;
pub mod task;
pub mod validation;

#[cfg(test)]
mod test_support;
