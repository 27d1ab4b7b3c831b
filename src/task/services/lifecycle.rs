//! Task creation, full and status-only edits, deletion and scoped reads.

use crate::access::{AccessError, Action, Actor, Visibility, policy};
use crate::identity::{
    domain::UserId,
    ports::{UserRepository, UserRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use crate::project::{
    domain::{MemberSet, Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::schedule::{DateRange, parse_date_fields, validate_task_dates};
use crate::task::{
    domain::{NewTask, Revision, Task, TaskChanges, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::validation::{Description, FieldErrors, Title};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const PROJECT_FIELD: &str = "project_id";
const ASSIGNEE_FIELD: &str = "assigned_user_id";
const STATUS_FIELD: &str = "status";

/// Input for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// First scheduled day as `YYYY-MM-DD`.
    pub start_date: String,
    /// Last scheduled day as `YYYY-MM-DD`.
    pub end_date: String,
    /// Parent project.
    pub project_id: ProjectId,
    /// Assigned user.
    pub assigned_user_id: UserId,
}

/// Full replacement of a task's editable fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskRequest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// First scheduled day as `YYYY-MM-DD`.
    pub start_date: String,
    /// Last scheduled day as `YYYY-MM-DD`.
    pub end_date: String,
    /// Status label.
    pub status: String,
    /// Parent project; may differ from the current one.
    pub project_id: ProjectId,
    /// Assigned user.
    pub assigned_user_id: UserId,
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Submitted fields failed validation.
    #[error(transparent)]
    Validation(FieldErrors),
    /// The actor may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The task changed since the caller read it.
    #[error("task {id} has changed since revision {expected} (now {actual})")]
    Conflict {
        /// Task being written.
        id: TaskId,
        /// Revision the caller read.
        expected: Revision,
        /// Revision currently stored.
        actual: Revision,
    },
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// Project lookup failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// Assignee lookup failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::RevisionConflict {
                id,
                expected,
                actual,
            } => Self::Conflict {
                id,
                expected,
                actual,
            },
            TaskRepositoryError::MissingProject(_) => Self::Validation(missing_project()),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskService<T, P, U, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<T, P, U, C> TaskService<T, P, U, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, projects: Arc<P>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
            users,
            clock,
        }
    }

    /// Returns one page of the tasks visible to the actor, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Access`] for disabled accounts.
    pub async fn list(&self, actor: &Actor, page: PageRequest) -> TaskServiceResult<Page<Task>> {
        policy::ensure_active(actor)?;
        Ok(self.tasks.list(Visibility::for_actor(actor), page).await?)
    }

    /// Returns every task visible to the actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Access`] for disabled accounts.
    pub async fn visible_tasks(&self, actor: &Actor) -> TaskServiceResult<Vec<Task>> {
        policy::ensure_active(actor)?;
        Ok(self
            .tasks
            .list_visible(Visibility::for_actor(actor))
            .await?)
    }

    /// Returns the projects the actor may create tasks in.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Access`] for disabled accounts.
    pub async fn assignable_projects(&self, actor: &Actor) -> TaskServiceResult<Vec<Project>> {
        policy::ensure_active(actor)?;
        Ok(self
            .projects
            .list_visible(Visibility::for_actor(actor))
            .await?)
    }

    /// Returns a task the actor may see.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown identifiers and
    /// [`TaskServiceError::Access`] when the task is not visible.
    pub async fn show(&self, actor: &Actor, id: TaskId) -> TaskServiceResult<Task> {
        policy::ensure_active(actor)?;
        let task = self.load(id).await?;
        let members = self.members_of(&task).await?;
        policy::authorize_task_view(actor, &task, &members).inspect_err(log_refusal)?;
        Ok(task)
    }

    /// Creates a pending task inside a project's date range.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Access`] unless the actor is an
    /// administrator or a member of the project, and
    /// [`TaskServiceError::Validation`] for invalid input, including dates
    /// outside the project's range.
    pub async fn create(&self, actor: &Actor, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        policy::ensure_active(actor)?;
        let Some(project) = self.projects.find_by_id(request.project_id).await? else {
            return Err(reject(missing_project()));
        };
        policy::authorize_task_create(actor, &project).inspect_err(log_refusal)?;

        let mut errors = FieldErrors::new();
        let fields = TaskFields::parse(
            &mut errors,
            request.title,
            request.description,
            (&request.start_date, &request.end_date),
            &project,
        );
        self.check_assignee(&mut errors, request.assigned_user_id)
            .await?;

        let Some((title, description, schedule)) = fields.complete() else {
            return Err(reject(errors));
        };
        if !errors.is_empty() {
            return Err(reject(errors));
        }

        let task = Task::new(
            NewTask {
                title,
                description,
                schedule,
                project_id: project.id(),
                assigned_to: request.assigned_user_id,
                created_by: actor.user_id(),
            },
            &*self.clock,
        );
        self.tasks.store(&task).await?;
        info!(
            actor = %actor.user_id(),
            task_id = %task.id(),
            project_id = %project.id(),
            "task created"
        );
        Ok(task)
    }

    /// Replaces a task's editable fields, re-checking its dates against the
    /// target project.
    ///
    /// `expected` is the revision the caller last read.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`], [`TaskServiceError::Access`],
    /// [`TaskServiceError::Validation`] or [`TaskServiceError::Conflict`],
    /// checked in that order.
    pub async fn update(
        &self,
        actor: &Actor,
        id: TaskId,
        expected: Revision,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        policy::ensure_active(actor)?;
        let mut task = self.load(id).await?;
        let members = self.members_of(&task).await?;
        policy::authorize_task_update(actor, &task, &members, Action::UpdateTask)
            .inspect_err(log_refusal)?;

        let Some(target) = self.projects.find_by_id(request.project_id).await? else {
            return Err(reject(missing_project()));
        };
        if target.id() != task.project_id() {
            policy::authorize_task_move(actor, &target).inspect_err(log_refusal)?;
        }

        let mut errors = FieldErrors::new();
        let fields = TaskFields::parse(
            &mut errors,
            request.title,
            request.description,
            (&request.start_date, &request.end_date),
            &target,
        );
        let status = errors.capture(STATUS_FIELD, TaskStatus::try_from(request.status.as_str()));
        self.check_assignee(&mut errors, request.assigned_user_id)
            .await?;

        let (Some((title, description, schedule)), Some(new_status)) = (fields.complete(), status)
        else {
            return Err(reject(errors));
        };
        if !errors.is_empty() {
            return Err(reject(errors));
        }

        if task.revision() != expected {
            warn!(
                task_id = %id,
                expected = %expected,
                actual = %task.revision(),
                "stale task update"
            );
            return Err(TaskServiceError::Conflict {
                id,
                expected,
                actual: task.revision(),
            });
        }

        task.apply(
            TaskChanges {
                title,
                description,
                schedule,
                status: new_status,
                project_id: target.id(),
                assigned_to: request.assigned_user_id,
            },
            &*self.clock,
        );
        self.persist(&task, expected).await?;
        info!(
            actor = %actor.user_id(),
            task_id = %id,
            revision = %task.revision(),
            "task updated"
        );
        Ok(task)
    }

    /// Sets only the status of a visible task.
    ///
    /// Setting the current status returns the task unchanged without a
    /// write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`], [`TaskServiceError::Access`],
    /// [`TaskServiceError::Validation`] for unknown labels, or
    /// [`TaskServiceError::Conflict`] when another write lands first.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: TaskId,
        status: &str,
    ) -> TaskServiceResult<Task> {
        policy::ensure_active(actor)?;
        let mut task = self.load(id).await?;
        let members = self.members_of(&task).await?;
        policy::authorize_task_update(actor, &task, &members, Action::UpdateTaskStatus)
            .inspect_err(log_refusal)?;

        let new_status = TaskStatus::try_from(status)
            .map_err(|err| reject(FieldErrors::single(STATUS_FIELD, err.to_string())))?;

        let expected = task.revision();
        if !task.set_status(new_status, &*self.clock) {
            debug!(task_id = %id, status = new_status.as_str(), "status unchanged");
            return Ok(task);
        }
        self.persist(&task, expected).await?;
        info!(
            actor = %actor.user_id(),
            task_id = %id,
            status = new_status.as_str(),
            "task status updated"
        );
        Ok(task)
    }

    /// Deletes a task. Its attachment records are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown identifiers and
    /// [`TaskServiceError::Access`] unless the actor is an administrator,
    /// the creator, or a project manager in the parent project.
    pub async fn delete(&self, actor: &Actor, id: TaskId) -> TaskServiceResult<()> {
        policy::ensure_active(actor)?;
        let task = self.load(id).await?;
        let members = self.members_of(&task).await?;
        policy::authorize_task_delete(actor, &task, &members).inspect_err(log_refusal)?;

        self.tasks.delete(id).await?;
        info!(actor = %actor.user_id(), task_id = %id, "task deleted");
        Ok(())
    }

    async fn load(&self, id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    async fn members_of(&self, task: &Task) -> TaskServiceResult<MemberSet> {
        Ok(self
            .projects
            .find_by_id(task.project_id())
            .await?
            .map(|project| project.members().clone())
            .unwrap_or_default())
    }

    async fn check_assignee(
        &self,
        errors: &mut FieldErrors,
        assignee: UserId,
    ) -> TaskServiceResult<()> {
        if self.users.find_by_id(assignee).await?.is_none() {
            errors.add(ASSIGNEE_FIELD, "the selected user does not exist");
        }
        Ok(())
    }

    async fn persist(&self, task: &Task, expected: Revision) -> TaskServiceResult<()> {
        self.tasks.update(task, expected).await.inspect_err(|err| {
            if matches!(err, TaskRepositoryError::RevisionConflict { .. }) {
                warn!(task_id = %task.id(), "concurrent task update");
            }
        })?;
        Ok(())
    }
}

/// Title, description and contained schedule parsed from a task form.
struct TaskFields {
    title: Option<Title>,
    description: Option<Description>,
    schedule: Option<DateRange>,
}

impl TaskFields {
    fn parse(
        errors: &mut FieldErrors,
        title: String,
        description: String,
        (start_date, end_date): (&str, &str),
        project: &Project,
    ) -> Self {
        let schedule = match parse_date_fields(start_date, end_date) {
            Ok((start, end)) => {
                let bounds = project.schedule();
                validate_task_dates(start, end, bounds.start(), bounds.end())
                    .map_err(|rejection| errors.merge(rejection.field_errors()))
                    .ok()
            }
            Err(date_errors) => {
                errors.merge(date_errors);
                None
            }
        };
        Self {
            title: errors.capture("title", Title::new(title)),
            description: errors.capture("description", Description::new(description)),
            schedule,
        }
    }

    fn complete(self) -> Option<(Title, Description, DateRange)> {
        Some((self.title?, self.description?, self.schedule?))
    }
}

fn missing_project() -> FieldErrors {
    FieldErrors::single(PROJECT_FIELD, "the selected project does not exist")
}

fn log_refusal(err: &AccessError) {
    if let AccessError::Forbidden { user_id, action } = err {
        debug!(actor = %user_id, action = %action, "task access refused");
    }
}

fn reject(errors: FieldErrors) -> TaskServiceError {
    debug!(fields = %errors, "task input rejected");
    TaskServiceError::Validation(errors)
}
