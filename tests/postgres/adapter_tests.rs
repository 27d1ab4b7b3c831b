//! Repository behaviour against a real database.

use std::sync::Arc;

use super::helpers::{scratch_database, seed_user};
use mockable::DefaultClock;
use workboard::attachment::{
    adapters::{postgres::PostgresAttachmentRepository, storage::InMemoryFileStorage},
    domain::AttachmentOwner,
    ports::AttachmentRepository,
    services::{AttachmentService, UploadedFile},
};
use workboard::config::UploadConfig;
use workboard::identity::{
    adapters::postgres::PostgresUserRepository,
    domain::{EmailAddress, Role},
    ports::{UserRepository, UserRepositoryError},
};
use workboard::pagination::PageRequest;
use workboard::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::Revision,
    services::{CreateProjectRequest, ProjectService, ProjectServiceError, UpdateProjectRequest},
};
use workboard::task::{
    adapters::postgres::PostgresTaskRepository,
    services::{CreateTaskRequest, TaskService, TaskServiceError},
};

fn project_request(users: Vec<workboard::identity::domain::UserId>) -> CreateProjectRequest {
    CreateProjectRequest {
        title: "Warehouse move".to_owned(),
        description: "Move stock to the new site".to_owned(),
        start_date: "2025-04-01".to_owned(),
        end_date: "2025-04-30".to_owned(),
        users,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn adapters_honour_visibility_revisions_and_cascades() -> eyre::Result<()> {
    let Some(database) = scratch_database()? else {
        return Ok(());
    };
    let pool = database.pool.clone();
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let projects = Arc::new(PostgresProjectRepository::new(pool.clone()));
    let tasks = Arc::new(PostgresTaskRepository::new(pool.clone()));
    let attachments = Arc::new(PostgresAttachmentRepository::new(pool));
    let clock = Arc::new(DefaultClock);

    let project_service =
        ProjectService::new(Arc::clone(&projects), Arc::clone(&users), Arc::clone(&clock));
    let task_service = TaskService::new(
        Arc::clone(&tasks),
        Arc::clone(&projects),
        Arc::clone(&users),
        Arc::clone(&clock),
    );
    let attachment_service = AttachmentService::new(
        Arc::clone(&attachments),
        Arc::new(InMemoryFileStorage::new()),
        Arc::clone(&projects),
        Arc::clone(&tasks),
        clock,
        &UploadConfig::default(),
    );

    let admin = seed_user(&users, "Root", &[Role::Administrator]).await?;
    let ana = seed_user(&users, "Ana", &[Role::TaskManager]).await?;
    let bea = seed_user(&users, "Bea", &[]).await?;

    let duplicate = seed_user(&users, "ANA", &[]).await;
    eyre::ensure!(duplicate.is_err(), "emails are unique case-insensitively");
    let found = users
        .find_by_email(&EmailAddress::new("ana@example.com")?)
        .await?
        .ok_or_else(|| eyre::eyre!("ana should exist"))?;
    eyre::ensure!(found.has_role(Role::TaskManager), "roles survive the JSON column");
    let searched = users.search(Some("BE"), PageRequest::default()).await?;
    eyre::ensure!(searched.total() == 1, "search is case-insensitive");

    let project = project_service
        .create(&admin, project_request(vec![ana.user_id()]))
        .await?;
    eyre::ensure!(project_service.visible_projects(&bea).await?.is_empty());
    eyre::ensure!(project_service.visible_projects(&ana).await?.len() == 1);

    let update = |title: &str| UpdateProjectRequest {
        title: title.to_owned(),
        description: "Move stock to the new site".to_owned(),
        start_date: "2025-04-01".to_owned(),
        end_date: "2025-04-30".to_owned(),
        status: "in_progress".to_owned(),
        users: vec![ana.user_id(), bea.user_id()],
    };
    let updated = project_service
        .update(&admin, project.id(), Revision::new(1), update("First"))
        .await?;
    eyre::ensure!(updated.revision() == Revision::new(2));
    eyre::ensure!(project_service.visible_projects(&bea).await?.len() == 1);
    let stale = project_service
        .update(&admin, project.id(), Revision::new(1), update("Second"))
        .await;
    eyre::ensure!(
        matches!(stale, Err(ProjectServiceError::Conflict { .. })),
        "stale project write should conflict, got {stale:?}"
    );

    let task = task_service
        .create(
            &ana,
            CreateTaskRequest {
                title: "Label shelves".to_owned(),
                description: "Every aisle".to_owned(),
                start_date: "2025-04-02".to_owned(),
                end_date: "2025-04-05".to_owned(),
                project_id: project.id(),
                assigned_user_id: ana.user_id(),
            },
        )
        .await?;
    eyre::ensure!(task_service.visible_tasks(&bea).await?.len() == 1, "members see project tasks");
    let started = task_service
        .update_status(&bea, task.id(), "in_progress")
        .await?;
    eyre::ensure!(started.revision() == Revision::new(2));

    let attachment = attachment_service
        .attach(
            &ana,
            AttachmentOwner::Task(task.id()),
            UploadedFile::new("labels.pdf", b"%PDF-1.4 labels".as_slice()),
        )
        .await?;

    let referenced = users.delete(ana.user_id()).await;
    eyre::ensure!(
        matches!(referenced, Err(UserRepositoryError::StillReferenced(id)) if id == ana.user_id()),
        "task assignees cannot be deleted, got {referenced:?}"
    );

    project_service.delete(&admin, project.id()).await?;
    let gone = task_service.show(&admin, task.id()).await;
    eyre::ensure!(
        matches!(gone, Err(TaskServiceError::NotFound(_))),
        "tasks go with their project"
    );
    let kept = attachments
        .find_by_id(attachment.id())
        .await?
        .ok_or_else(|| eyre::eyre!("attachment records outlive their owner"))?;
    eyre::ensure!(kept.owner() == attachment.owner());
    eyre::ensure!(kept.checksum() == attachment.checksum());

    let deleted = users.delete(bea.user_id()).await;
    eyre::ensure!(deleted.is_ok(), "members can be deleted once unreferenced");
    users.delete(ana.user_id()).await?;
    let missing = users.delete(bea.user_id()).await;
    eyre::ensure!(matches!(missing, Err(UserRepositoryError::NotFound(_))));

    drop(database);
    Ok(())
}
