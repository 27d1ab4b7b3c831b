//! Project creation, editing, deletion and visibility-scoped reads.

use crate::access::{AccessError, Actor, Visibility, policy};
use crate::identity::{
    domain::UserId,
    ports::{UserRepository, UserRepositoryError},
};
use crate::pagination::{Page, PageRequest};
use crate::project::{
    domain::{
        MemberSet, NewProject, Project, ProjectChanges, ProjectId, ProjectStatus, Revision,
    },
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::schedule::{DateRange, parse_range_fields};
use crate::validation::{Description, FieldErrors, Title};
use mockable::Clock;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const USERS_FIELD: &str = "users";

/// Input for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// First scheduled day as `YYYY-MM-DD`.
    pub start_date: String,
    /// Last scheduled day as `YYYY-MM-DD`.
    pub end_date: String,
    /// Initial members.
    #[serde(default)]
    pub users: Vec<UserId>,
}

/// Full replacement of a project's editable fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectRequest {
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
    /// Replacement member set.
    #[serde(default)]
    pub users: Vec<UserId>,
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Submitted fields failed validation.
    #[error(transparent)]
    Validation(FieldErrors),
    /// The actor may not perform the operation.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
    /// The project changed since the caller read it.
    #[error("project {id} has changed since revision {expected} (now {actual})")]
    Conflict {
        /// Project being written.
        id: ProjectId,
        /// Revision the caller read.
        expected: Revision,
        /// Revision currently stored.
        actual: Revision,
    },
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(ProjectRepositoryError),
    /// Member lookup failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
}

impl From<ProjectRepositoryError> for ProjectServiceError {
    fn from(err: ProjectRepositoryError) -> Self {
        match err {
            ProjectRepositoryError::NotFound(id) => Self::NotFound(id),
            ProjectRepositoryError::RevisionConflict {
                id,
                expected,
                actual,
            } => Self::Conflict {
                id,
                expected,
                actual,
            },
            other => Self::Repository(other),
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project lifecycle orchestration service.
#[derive(Clone)]
pub struct ProjectService<P, U, C>
where
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<P, U, C> ProjectService<P, U, C>
where
    P: ProjectRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            projects,
            users,
            clock,
        }
    }

    /// Returns one page of the projects visible to the actor, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Access`] for disabled accounts.
    pub async fn list(&self, actor: &Actor, page: PageRequest) -> ProjectServiceResult<Page<Project>> {
        policy::ensure_active(actor)?;
        Ok(self
            .projects
            .list(Visibility::for_actor(actor), page)
            .await?)
    }

    /// Returns every project visible to the actor.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Access`] for disabled accounts.
    pub async fn visible_projects(&self, actor: &Actor) -> ProjectServiceResult<Vec<Project>> {
        policy::ensure_active(actor)?;
        Ok(self
            .projects
            .list_visible(Visibility::for_actor(actor))
            .await?)
    }

    /// Returns a project the actor may see.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for unknown identifiers and
    /// [`ProjectServiceError::Access`] when the project is not visible.
    pub async fn show(&self, actor: &Actor, id: ProjectId) -> ProjectServiceResult<Project> {
        policy::ensure_active(actor)?;
        let project = self.load(id).await?;
        policy::authorize_project_view(actor, &project).inspect_err(log_refusal)?;
        Ok(project)
    }

    /// Creates a pending project. The creator is not added as a member.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Access`] unless the actor is an
    /// administrator or project manager, and
    /// [`ProjectServiceError::Validation`] for invalid input.
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        policy::ensure_active(actor)?;
        policy::authorize_project_create(actor).inspect_err(log_refusal)?;

        let mut errors = FieldErrors::new();
        let fields = ProjectFields::parse(
            &mut errors,
            request.title,
            request.description,
            &request.start_date,
            &request.end_date,
        );
        let members = self.resolve_members(&mut errors, &request.users).await?;

        let (Some((title, description, schedule)), Some(member_set)) = (fields.complete(), members)
        else {
            return Err(reject(errors));
        };

        let project = Project::new(
            NewProject {
                title,
                description,
                schedule,
                members: member_set,
                created_by: actor.user_id(),
            },
            &*self.clock,
        );
        self.projects.store(&project).await?;
        info!(
            actor = %actor.user_id(),
            project_id = %project.id(),
            members = project.members().len(),
            "project created"
        );
        Ok(project)
    }

    /// Replaces a project's editable fields and member set.
    ///
    /// `expected` is the revision the caller last read.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`],
    /// [`ProjectServiceError::Access`], [`ProjectServiceError::Validation`]
    /// or [`ProjectServiceError::Conflict`], checked in that order.
    pub async fn update(
        &self,
        actor: &Actor,
        id: ProjectId,
        expected: Revision,
        request: UpdateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        policy::ensure_active(actor)?;
        let mut project = self.load(id).await?;
        policy::authorize_project_update(actor, &project).inspect_err(log_refusal)?;

        let mut errors = FieldErrors::new();
        let fields = ProjectFields::parse(
            &mut errors,
            request.title,
            request.description,
            &request.start_date,
            &request.end_date,
        );
        let status = errors.capture("status", ProjectStatus::try_from(request.status.as_str()));
        let members = self.resolve_members(&mut errors, &request.users).await?;

        let (Some((title, description, schedule)), Some(new_status), Some(member_set)) =
            (fields.complete(), status, members)
        else {
            return Err(reject(errors));
        };

        if project.revision() != expected {
            warn!(
                project_id = %id,
                expected = %expected,
                actual = %project.revision(),
                "stale project update"
            );
            return Err(ProjectServiceError::Conflict {
                id,
                expected,
                actual: project.revision(),
            });
        }

        project.apply(
            ProjectChanges {
                title,
                description,
                schedule,
                status: new_status,
                members: member_set,
            },
            &*self.clock,
        );
        self.projects
            .update(&project, expected)
            .await
            .inspect_err(|err| {
                if matches!(err, ProjectRepositoryError::RevisionConflict { .. }) {
                    warn!(project_id = %id, "concurrent project update");
                }
            })?;
        info!(
            actor = %actor.user_id(),
            project_id = %id,
            revision = %project.revision(),
            "project updated"
        );
        Ok(project)
    }

    /// Deletes a project with its tasks and memberships.
    ///
    /// Attachment records that name the project as owner are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for unknown identifiers and
    /// [`ProjectServiceError::Access`] unless the actor is an administrator
    /// or the creator.
    pub async fn delete(&self, actor: &Actor, id: ProjectId) -> ProjectServiceResult<()> {
        policy::ensure_active(actor)?;
        let project = self.load(id).await?;
        policy::authorize_project_delete(actor, &project).inspect_err(log_refusal)?;

        self.projects.delete(id).await?;
        info!(actor = %actor.user_id(), project_id = %id, "project deleted");
        Ok(())
    }

    async fn load(&self, id: ProjectId) -> ProjectServiceResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))
    }

    /// Checks that at least one member is selected and that every selected
    /// account exists.
    async fn resolve_members(
        &self,
        errors: &mut FieldErrors,
        requested: &[UserId],
    ) -> ProjectServiceResult<Option<MemberSet>> {
        let unique: BTreeSet<UserId> = requested.iter().copied().collect();
        if unique.is_empty() {
            errors.add(USERS_FIELD, "select at least one member");
            return Ok(None);
        }

        let ids: Vec<UserId> = unique.iter().copied().collect();
        let found: BTreeSet<UserId> = self
            .users
            .find_many(&ids)
            .await?
            .iter()
            .map(|user| user.id())
            .collect();
        let missing: Vec<UserId> = unique.difference(&found).copied().collect();
        if !missing.is_empty() {
            for id in missing {
                errors.add(USERS_FIELD, format!("user {id} does not exist"));
            }
            return Ok(None);
        }

        Ok(MemberSet::new(unique).ok())
    }
}

/// Title, description and schedule parsed from a project form.
struct ProjectFields {
    title: Option<Title>,
    description: Option<Description>,
    schedule: Option<DateRange>,
}

impl ProjectFields {
    fn parse(
        errors: &mut FieldErrors,
        title: String,
        description: String,
        start_date: &str,
        end_date: &str,
    ) -> Self {
        let schedule = match parse_range_fields(start_date, end_date) {
            Ok(range) => Some(range),
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

fn log_refusal(err: &AccessError) {
    if let AccessError::Forbidden { user_id, action } = err {
        debug!(actor = %user_id, action = %action, "project access refused");
    }
}

fn reject(errors: FieldErrors) -> ProjectServiceError {
    debug!(fields = %errors, "project input rejected");
    ProjectServiceError::Validation(errors)
}
