//! Account administration through the directory service.

use crate::test_helpers::Workspace;
use rstest::{fixture, rstest};
use workboard::access::AccessError;
use workboard::identity::domain::Role;
use workboard::identity::services::{CreateUserRequest, UserDirectoryError};
use workboard::pagination::PageRequest;

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn request(email: &str, roles: &[&str]) -> CreateUserRequest {
    CreateUserRequest {
        name: "Lucia Gomez".to_owned(),
        email: email.to_owned(),
        password: "correct horse".to_owned(),
        password_confirmation: "correct horse".to_owned(),
        phone: Some("+34 600 000 000".to_owned()),
        is_active: None,
        roles: roles.iter().map(|label| (*label).to_owned()).collect(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_accounts_can_log_in(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;

    let created = workspace
        .directory
        .create(&admin, request("Lucia@Example.com", &["Responsable de tarea"]))
        .await?;
    let verified = workspace
        .directory
        .verify_credentials("lucia@example.com", "correct horse")
        .await?;
    let wrong = workspace
        .directory
        .verify_credentials("lucia@example.com", "wrong horse")
        .await;

    eyre::ensure!(created.email().as_str() == "lucia@example.com");
    eyre::ensure!(created.has_role(Role::TaskManager));
    eyre::ensure!(verified.id() == created.id());
    eyre::ensure!(matches!(wrong, Err(UserDirectoryError::InvalidCredentials)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn role_labels_must_match_exactly(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;

    let result = workspace
        .directory
        .create(&admin, request("lucia@example.com", &["administrador"]))
        .await;

    let Err(UserDirectoryError::Validation(errors)) = result else {
        eyre::bail!("expected a validation failure, got {result:?}");
    };
    eyre::ensure!(errors.contains("roles"), "roles should be flagged");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn administrators_cannot_delete_themselves(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let other = workspace.seed_user("Ana", &[]).await?;

    let own = workspace.directory.delete(&admin, admin.user_id()).await;
    workspace.directory.delete(&admin, other.user_id()).await?;

    eyre::ensure!(matches!(own, Err(UserDirectoryError::SelfDeletion(id)) if id == admin.user_id()));
    let remaining = workspace.directory.list(&admin, None, PageRequest::default()).await?;
    eyre::ensure!(remaining.total() == 1, "only the administrator remains");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn referenced_accounts_cannot_be_deleted(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let manager = workspace.seed_user("Marta", &[Role::ProjectManager]).await?;
    let ana = workspace.seed_user("Ana", &[]).await?;
    let project = workspace
        .create_project(&manager, ("2025-01-01", "2025-01-31"), &[manager.user_id()])
        .await?;
    workspace
        .create_task(&manager, &project, ana.user_id(), ("2025-01-02", "2025-01-09"))
        .await?;

    let assignee = workspace.directory.delete(&admin, ana.user_id()).await;
    let creator = workspace.directory.delete(&admin, manager.user_id()).await;

    eyre::ensure!(
        matches!(assignee, Err(UserDirectoryError::StillReferenced(id)) if id == ana.user_id()),
        "assignee deletion should be refused, got {assignee:?}"
    );
    eyre::ensure!(
        matches!(creator, Err(UserDirectoryError::StillReferenced(id)) if id == manager.user_id()),
        "creator deletion should be refused, got {creator:?}"
    );

    workspace.projects.delete(&admin, project.id()).await?;
    workspace.directory.delete(&admin, ana.user_id()).await?;
    workspace.directory.delete(&admin, manager.user_id()).await?;
    let remaining = workspace.directory.list(&admin, None, PageRequest::default()).await?;
    eyre::ensure!(remaining.total() == 1, "only the administrator remains");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_administrators_cannot_list_accounts(workspace: Workspace) -> eyre::Result<()> {
    let manager = workspace.seed_user("Marta", &[Role::ProjectManager]).await?;

    let result = workspace
        .directory
        .list(&manager, Some("a"), PageRequest::default())
        .await;

    eyre::ensure!(matches!(
        result,
        Err(UserDirectoryError::Access(AccessError::MissingRole {
            role: Role::Administrator,
            ..
        }))
    ));
    Ok(())
}
