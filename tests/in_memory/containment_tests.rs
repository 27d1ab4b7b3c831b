//! Task dates must stay inside their project's dates.

use crate::test_helpers::{Workspace, task_request};
use rstest::{fixture, rstest};
use workboard::identity::domain::Role;
use workboard::task::services::{TaskServiceError, UpdateTaskRequest};

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

#[rstest]
#[case(("2025-01-01", "2025-01-31"))]
#[case(("2025-01-10", "2025-01-11"))]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_inside_the_project_range_are_accepted(
    workspace: Workspace,
    #[case] dates: (&str, &str),
) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let project = workspace
        .create_project(&admin, ("2025-01-01", "2025-01-31"), &[admin.user_id()])
        .await?;

    let task = workspace
        .create_task(&admin, &project, admin.user_id(), dates)
        .await?;

    eyre::ensure!(task.schedule().start() >= project.schedule().start());
    eyre::ensure!(task.schedule().end() <= project.schedule().end());
    eyre::ensure!(task.schedule().end() > task.schedule().start());
    Ok(())
}

#[rstest]
#[case::starts_early(("2024-12-31", "2025-01-10"))]
#[case::ends_late(("2025-01-10", "2025-02-01"))]
#[case::same_day(("2025-01-10", "2025-01-10"))]
#[case::inverted(("2025-01-12", "2025-01-10"))]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_outside_the_project_range_flag_both_dates(
    workspace: Workspace,
    #[case] dates: (&str, &str),
) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let project = workspace
        .create_project(&admin, ("2025-01-01", "2025-01-31"), &[admin.user_id()])
        .await?;

    let result = workspace
        .tasks
        .create(&admin, task_request(&project, admin.user_id(), dates))
        .await;

    let Err(TaskServiceError::Validation(errors)) = result else {
        eyre::bail!("expected a validation failure, got {result:?}");
    };
    eyre::ensure!(errors.contains("start_date"), "start_date should be flagged");
    eyre::ensure!(errors.contains("end_date"), "end_date should be flagged");
    eyre::ensure!(
        workspace.tasks.visible_tasks(&admin).await?.is_empty(),
        "nothing should be stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_a_task_checks_the_target_project_range(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let january = workspace
        .create_project(&admin, ("2025-01-01", "2025-01-31"), &[admin.user_id()])
        .await?;
    let march = workspace
        .create_project(&admin, ("2025-03-01", "2025-03-31"), &[admin.user_id()])
        .await?;
    let task = workspace
        .create_task(&admin, &january, admin.user_id(), ("2025-01-05", "2025-01-06"))
        .await?;

    let request = UpdateTaskRequest {
        title: "Gather figures".to_owned(),
        description: "From every department".to_owned(),
        start_date: "2025-01-05".to_owned(),
        end_date: "2025-01-06".to_owned(),
        status: "in_progress".to_owned(),
        project_id: march.id(),
        assigned_user_id: admin.user_id(),
    };
    let result = workspace
        .tasks
        .update(&admin, task.id(), task.revision(), request)
        .await;

    let Err(TaskServiceError::Validation(errors)) = result else {
        eyre::bail!("expected a validation failure, got {result:?}");
    };
    eyre::ensure!(errors.contains("start_date") && errors.contains("end_date"));
    let unchanged = workspace.tasks.show(&admin, task.id()).await?;
    eyre::ensure!(unchanged.project_id() == january.id(), "task must stay put");
    Ok(())
}
