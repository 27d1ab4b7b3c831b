//! Shared world state for workboard BDD scenarios.

use std::collections::HashMap;

use crate::test_helpers::Workspace;
use rstest::fixture;
use workboard::access::Actor;
use workboard::project::domain::Project;
use workboard::validation::FieldErrors;

/// Observable result of the step under test.
#[derive(Debug)]
pub enum Outcome {
    /// The operation succeeded.
    Succeeded,
    /// Input was rejected with field errors.
    Rejected(FieldErrors),
    /// The actor was refused.
    Refused,
    /// An administrator tried to delete their own account.
    SelfDeletion,
    /// Any other failure, rendered for the assertion message.
    Failed(String),
}

/// Scenario world for workboard behaviour tests.
pub struct WorkboardWorld {
    pub workspace: Workspace,
    pub actors: HashMap<String, Actor>,
    pub last_project: Option<Project>,
    pub last_outcome: Option<Outcome>,
}

impl WorkboardWorld {
    /// Creates a world with an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            actors: HashMap::new(),
            last_project: None,
            last_outcome: None,
        }
    }

    /// Returns the actor seeded under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no such actor was seeded.
    pub fn actor(&self, name: &str) -> eyre::Result<Actor> {
        self.actors
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("unknown actor {name} in scenario world"))
    }
}

impl Default for WorkboardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkboardWorld {
    WorkboardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
