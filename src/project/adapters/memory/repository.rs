//! In-memory repository for projects and their memberships.

use crate::access::Visibility;
use crate::pagination::{Page, PageRequest};
use crate::project::{
    domain::{Project, ProjectId, Revision},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::store::InMemoryDatabase;
use crate::store::memory::{Tables, sort_oldest_first};
use async_trait::async_trait;

/// Project repository over the shared [`InMemoryDatabase`].
#[derive(Debug, Clone)]
pub struct InMemoryProjectRepository {
    database: InMemoryDatabase,
}

impl InMemoryProjectRepository {
    /// Creates a repository over `database`.
    #[must_use]
    pub const fn new(database: InMemoryDatabase) -> Self {
        Self { database }
    }

    fn visible(&self, visibility: Visibility) -> ProjectRepositoryResult<Vec<Project>> {
        let tables = self
            .database
            .read()
            .map_err(ProjectRepositoryError::persistence)?;
        Ok(collect_visible(&tables, visibility))
    }
}

fn collect_visible(tables: &Tables, visibility: Visibility) -> Vec<Project> {
    let mut projects: Vec<Project> = tables
        .projects
        .values()
        .filter(|project| visibility.admits_project(project))
        .cloned()
        .collect();
    sort_oldest_first(&mut projects, |project| (project.created_at(), project.id()));
    projects
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(ProjectRepositoryError::persistence)?;

        if tables.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        tables.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project, expected: Revision) -> ProjectRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(ProjectRepositoryError::persistence)?;

        let stored = tables
            .projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        if stored.revision() != expected {
            return Err(ProjectRepositoryError::RevisionConflict {
                id: project.id(),
                expected,
                actual: stored.revision(),
            });
        }
        *stored = project.clone();
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(ProjectRepositoryError::persistence)?;

        tables
            .projects
            .remove(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        tables.tasks.retain(|_, task| task.project_id() != id);
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let tables = self
            .database
            .read()
            .map_err(ProjectRepositoryError::persistence)?;
        Ok(tables.projects.get(&id).cloned())
    }

    async fn list(
        &self,
        visibility: Visibility,
        page: PageRequest,
    ) -> ProjectRepositoryResult<Page<Project>> {
        Ok(page.slice(self.visible(visibility)?))
    }

    async fn list_visible(&self, visibility: Visibility) -> ProjectRepositoryResult<Vec<Project>> {
        self.visible(visibility)
    }
}
