//! When steps for workboard BDD scenarios.

use super::world::{Outcome, WorkboardWorld, run_async};
use crate::test_helpers::task_request;
use rstest_bdd_macros::when;
use workboard::identity::services::UserDirectoryError;
use workboard::task::services::TaskServiceError;

#[when(r#""{name}" creates a task from "{start}" to "{end}""#)]
fn creates_a_task(
    world: &mut WorkboardWorld,
    name: String,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let project = world
        .last_project
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?;
    let request = task_request(project, actor.user_id(), (&start, &end));

    let outcome = match run_async(world.workspace.tasks.create(&actor, request)) {
        Ok(_) => Outcome::Succeeded,
        Err(TaskServiceError::Validation(errors)) => Outcome::Rejected(errors),
        Err(TaskServiceError::Access(_)) => Outcome::Refused,
        Err(other) => Outcome::Failed(other.to_string()),
    };
    world.last_outcome = Some(outcome);
    Ok(())
}

#[when(r#""{name}" deletes the account of "{target}""#)]
fn deletes_an_account(
    world: &mut WorkboardWorld,
    name: String,
    target: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let target_id = world.actor(&target)?.user_id();

    let outcome = match run_async(world.workspace.directory.delete(&actor, target_id)) {
        Ok(()) => Outcome::Succeeded,
        Err(UserDirectoryError::SelfDeletion(_)) => Outcome::SelfDeletion,
        Err(UserDirectoryError::Access(_)) => Outcome::Refused,
        Err(other) => Outcome::Failed(other.to_string()),
    };
    world.last_outcome = Some(outcome);
    Ok(())
}
