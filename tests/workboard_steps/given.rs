//! Given steps for workboard BDD scenarios.

use super::world::{WorkboardWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use workboard::identity::domain::Role;

fn seed(world: &mut WorkboardWorld, name: String, roles: &[Role]) -> Result<(), eyre::Report> {
    let actor = run_async(world.workspace.seed_user(&name, roles))?;
    world.actors.insert(name, actor);
    Ok(())
}

#[given(r#"an administrator "{name}""#)]
fn an_administrator(world: &mut WorkboardWorld, name: String) -> Result<(), eyre::Report> {
    seed(world, name, &[Role::Administrator])
}

#[given(r#"a project manager "{name}""#)]
fn a_project_manager(world: &mut WorkboardWorld, name: String) -> Result<(), eyre::Report> {
    seed(world, name, &[Role::ProjectManager])
}

#[given(r#"a user "{name}" with no roles"#)]
fn a_user_without_roles(world: &mut WorkboardWorld, name: String) -> Result<(), eyre::Report> {
    seed(world, name, &[])
}

#[given(r#"a project from "{start}" to "{end}" with member "{member}""#)]
fn a_project(
    world: &mut WorkboardWorld,
    start: String,
    end: String,
    member: String,
) -> Result<(), eyre::Report> {
    let creator = world
        .actors
        .values()
        .find(|actor| actor.is_admin())
        .cloned()
        .ok_or_else(|| eyre::eyre!("scenario needs an administrator to create projects"))?;
    create_project(world, &creator, (&start, &end), &member)
}

#[given(r#"a project created by "{creator}" from "{start}" to "{end}" with member "{member}""#)]
fn a_project_created_by(
    world: &mut WorkboardWorld,
    creator: String,
    start: String,
    end: String,
    member: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&creator)?;
    create_project(world, &actor, (&start, &end), &member)
}

fn create_project(
    world: &mut WorkboardWorld,
    creator: &workboard::access::Actor,
    dates: (&str, &str),
    member: &str,
) -> Result<(), eyre::Report> {
    let member_id = world.actor(member)?.user_id();
    let project = run_async(world.workspace.create_project(creator, dates, &[member_id]))
        .wrap_err("create project in scenario setup")?;
    world.last_project = Some(project);
    Ok(())
}
