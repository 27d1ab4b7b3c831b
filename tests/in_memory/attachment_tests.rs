//! Files linked to projects and tasks.

use crate::test_helpers::Workspace;
use rstest::{fixture, rstest};
use workboard::attachment::domain::AttachmentOwner;
use workboard::attachment::services::{AttachmentServiceError, UploadedFile};
use workboard::identity::domain::Role;

const PDF: &[u8] = b"%PDF-1.5 agenda";

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_files_survive_project_deletion(workspace: Workspace) -> eyre::Result<()> {
    let manager = workspace.seed_user("Marta", &[Role::ProjectManager]).await?;
    let ana = workspace.seed_user("Ana", &[]).await?;
    let project = workspace
        .create_project(&manager, ("2025-01-01", "2025-01-31"), &[ana.user_id()])
        .await?;
    let owner = AttachmentOwner::Project(project.id());

    let attached = workspace
        .attachments
        .attach_all(
            &manager,
            owner,
            vec![
                UploadedFile::new("agenda.pdf", PDF),
                UploadedFile::new("minutes.pdf", PDF),
            ],
        )
        .await?;
    eyre::ensure!(attached.len() == 2);
    eyre::ensure!(workspace.storage.len() == 2);

    let listed = workspace.attachments.list_for_owner(&ana, owner).await?;
    eyre::ensure!(listed == attached, "members list the files oldest first");

    workspace.projects.delete(&manager, project.id()).await?;

    let after = workspace.attachments.list_for_owner(&ana, owner).await;
    eyre::ensure!(
        matches!(after, Err(AttachmentServiceError::OwnerNotFound(missing)) if missing == owner),
        "the owner is gone, got {after:?}"
    );
    let first = attached.first().ok_or_else(|| eyre::eyre!("no attachment"))?;
    workspace.attachments.delete(&manager, first.id()).await?;
    eyre::ensure!(workspace.storage.len() == 1, "the record outlived its owner");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_attaches_to_own_task(workspace: Workspace) -> eyre::Result<()> {
    let admin = workspace.seed_user("Root", &[Role::Administrator]).await?;
    let ana = workspace.seed_user("Ana", &[Role::TaskManager]).await?;
    let project = workspace
        .create_project(&admin, ("2025-01-01", "2025-01-31"), &[admin.user_id()])
        .await?;
    let task = workspace
        .create_task(&admin, &project, ana.user_id(), ("2025-01-02", "2025-01-09"))
        .await?;

    let attachment = workspace
        .attachments
        .attach(&ana, AttachmentOwner::Task(task.id()), UploadedFile::new("scan.pdf", PDF))
        .await?;

    eyre::ensure!(attachment.uploaded_by() == ana.user_id());
    eyre::ensure!(attachment.path().starts_with("uploads/"));
    Ok(())
}
