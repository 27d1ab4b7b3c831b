//! Revision checks on concurrent edits.

use crate::test_helpers::Workspace;
use rstest::{fixture, rstest};
use workboard::identity::domain::Role;
use workboard::project::domain::Revision;
use workboard::task::domain::TaskStatus;
use workboard::task::services::{TaskServiceError, UpdateTaskRequest};

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn full_update(
    project_id: workboard::project::domain::ProjectId,
    assignee: workboard::identity::domain::UserId,
    title: &str,
) -> UpdateTaskRequest {
    UpdateTaskRequest {
        title: title.to_owned(),
        description: "Edited".to_owned(),
        start_date: "2025-01-02".to_owned(),
        end_date: "2025-01-04".to_owned(),
        status: "pending".to_owned(),
        project_id,
        assigned_user_id: assignee,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_writer_with_stale_revision_conflicts(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let project = workspace
        .create_project(&admin, ("2025-01-01", "2025-01-31"), &[admin.user_id()])
        .await?;
    let task = workspace
        .create_task(&admin, &project, admin.user_id(), ("2025-01-02", "2025-01-03"))
        .await?;
    let read_revision = task.revision();

    let first = workspace
        .tasks
        .update(
            &admin,
            task.id(),
            read_revision,
            full_update(project.id(), admin.user_id(), "First"),
        )
        .await?;
    let second = workspace
        .tasks
        .update(
            &admin,
            task.id(),
            read_revision,
            full_update(project.id(), admin.user_id(), "Second"),
        )
        .await;

    eyre::ensure!(first.revision() == Revision::new(2));
    eyre::ensure!(
        matches!(
            second,
            Err(TaskServiceError::Conflict { expected, actual, .. })
                if expected == read_revision && actual == Revision::new(2)
        ),
        "expected a conflict, got {second:?}"
    );
    let stored = workspace.tasks.show(&admin, task.id()).await?;
    eyre::ensure!(stored.title().as_str() == "First", "the first write must win");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_updates_bump_the_revision_once(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let project = workspace
        .create_project(&admin, ("2025-01-01", "2025-01-31"), &[admin.user_id()])
        .await?;
    let task = workspace
        .create_task(&admin, &project, admin.user_id(), ("2025-01-02", "2025-01-03"))
        .await?;

    let started = workspace
        .tasks
        .update_status(&admin, task.id(), "in_progress")
        .await?;
    let again = workspace
        .tasks
        .update_status(&admin, task.id(), "in_progress")
        .await?;

    eyre::ensure!(started.status() == TaskStatus::InProgress);
    eyre::ensure!(started.revision() == Revision::new(2));
    eyre::ensure!(again.revision() == Revision::new(2), "same status must not write");
    Ok(())
}
