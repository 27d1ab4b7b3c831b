//! Then steps for workboard BDD scenarios.

use super::world::{Outcome, WorkboardWorld, run_async};
use rstest_bdd_macros::then;

fn outcome(world: &WorkboardWorld) -> eyre::Result<&Outcome> {
    world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing outcome in scenario world"))
}

fn ensure_succeeded(world: &WorkboardWorld) -> eyre::Result<()> {
    let result = outcome(world)?;
    if !matches!(result, Outcome::Succeeded) {
        return Err(eyre::eyre!("expected success, got {result:?}"));
    }
    Ok(())
}

#[then("the request succeeds")]
fn request_succeeds(world: &WorkboardWorld) -> Result<(), eyre::Report> {
    ensure_succeeded(world)
}

#[then("the task is stored")]
fn task_is_stored(world: &WorkboardWorld) -> Result<(), eyre::Report> {
    ensure_succeeded(world)?;
    let admin = world
        .actors
        .values()
        .find(|actor| actor.is_admin())
        .ok_or_else(|| eyre::eyre!("scenario needs an administrator"))?;
    let tasks = run_async(world.workspace.tasks.visible_tasks(admin))?;
    eyre::ensure!(tasks.len() == 1, "expected one stored task, found {}", tasks.len());
    Ok(())
}

#[then(r#"the request is rejected on "{first}" and "{second}""#)]
fn request_is_rejected_on(
    world: &WorkboardWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let result = outcome(world)?;
    let Outcome::Rejected(errors) = result else {
        return Err(eyre::eyre!("expected field errors, got {result:?}"));
    };
    for field in [first, second] {
        eyre::ensure!(errors.contains(&field), "expected an error on {field}, got {errors}");
    }
    Ok(())
}

#[then("the request is refused")]
fn request_is_refused(world: &WorkboardWorld) -> Result<(), eyre::Report> {
    let result = outcome(world)?;
    if !matches!(result, Outcome::Refused) {
        return Err(eyre::eyre!("expected a refusal, got {result:?}"));
    }
    Ok(())
}

#[then("the deletion is refused as self-deletion")]
fn deletion_is_self_deletion(world: &WorkboardWorld) -> Result<(), eyre::Report> {
    let result = outcome(world)?;
    if !matches!(result, Outcome::SelfDeletion) {
        return Err(eyre::eyre!("expected a self-deletion refusal, got {result:?}"));
    }
    Ok(())
}

#[then(r#""{name}" can see {count:usize} of the projects"#)]
fn can_see_projects(world: &WorkboardWorld, name: String, count: usize) -> Result<(), eyre::Report> {
    let actor = world.actor(&name)?;
    let visible = run_async(world.workspace.projects.visible_projects(&actor))?;
    eyre::ensure!(
        visible.len() == count,
        "{name} should see {count} projects, sees {}",
        visible.len()
    );
    Ok(())
}
