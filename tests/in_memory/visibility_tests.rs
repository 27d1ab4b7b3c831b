//! Visibility of projects and tasks across roles.

use crate::test_helpers::Workspace;
use rstest::{fixture, rstest};
use workboard::access::{AccessError, Actor};
use workboard::identity::domain::Role;
use workboard::pagination::PageRequest;
use workboard::project::services::ProjectServiceError;
use workboard::task::services::TaskServiceError;

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_see_only_their_projects_and_related_tasks(
    workspace: Workspace,
) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let ana = workspace.seed_user("Ana", &[Role::TaskManager]).await?;
    let bea = workspace.seed_user("Bea", &[Role::TaskManager]).await?;
    let carl = workspace.seed_user("Carl", &[]).await?;

    let shared = workspace
        .create_project(&admin, ("2025-01-01", "2025-01-31"), &[ana.user_id()])
        .await?;
    let other = workspace
        .create_project(&admin, ("2025-01-01", "2025-01-31"), &[bea.user_id()])
        .await?;
    let assigned_to_carl = workspace
        .create_task(&admin, &other, carl.user_id(), ("2025-01-02", "2025-01-03"))
        .await?;
    let in_shared = workspace
        .create_task(&ana, &shared, ana.user_id(), ("2025-01-02", "2025-01-03"))
        .await?;

    let ana_projects = workspace.projects.visible_projects(&ana).await?;
    eyre::ensure!(
        ana_projects.iter().map(|p| p.id()).collect::<Vec<_>>() == vec![shared.id()],
        "ana should see only the shared project"
    );

    let carl_tasks = workspace.tasks.visible_tasks(&carl).await?;
    eyre::ensure!(
        carl_tasks.iter().map(|t| t.id()).collect::<Vec<_>>() == vec![assigned_to_carl.id()],
        "carl should see only his assigned task"
    );
    eyre::ensure!(
        workspace.projects.visible_projects(&carl).await?.is_empty(),
        "carl is a member of no project"
    );

    let admin_tasks = workspace.tasks.visible_tasks(&admin).await?;
    eyre::ensure!(admin_tasks.len() == 2, "administrators see every task");

    let refused = workspace.tasks.show(&bea, in_shared.id()).await;
    eyre::ensure!(
        matches!(refused, Err(TaskServiceError::Access(AccessError::Forbidden { .. }))),
        "bea may not open a task in a project she does not belong to"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_are_paginated_oldest_first(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let ana = workspace.seed_user("Ana", &[]).await?;

    let mut created = Vec::new();
    for _ in 0..3 {
        created.push(
            workspace
                .create_project(&admin, ("2025-03-01", "2025-03-31"), &[ana.user_id()])
                .await?
                .id(),
        );
    }

    let first = workspace
        .projects
        .list(&ana, PageRequest::from_query(Some(1), Some(2)))
        .await?;
    let second = workspace
        .projects
        .list(&ana, PageRequest::from_query(Some(2), Some(2)))
        .await?;

    eyre::ensure!(first.total() == 3 && first.total_pages() == 2, "page metadata");
    let order: Vec<_> = first
        .items()
        .iter()
        .chain(second.items())
        .map(|p| p.id())
        .collect();
    eyre::ensure!(order == created, "projects should come back oldest first");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_accounts_are_refused_everywhere(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let disabled = Actor::new(admin.user_id(), admin.roles().clone(), false);

    let result = workspace.projects.visible_projects(&disabled).await;

    eyre::ensure!(
        matches!(
            result,
            Err(ProjectServiceError::Access(AccessError::AccountDisabled(id))) if id == admin.user_id()
        ),
        "disabled actor should be refused"
    );
    Ok(())
}
