//! In-memory repository for tasks.

use crate::access::Visibility;
use crate::pagination::{Page, PageRequest};
use crate::store::InMemoryDatabase;
use crate::store::memory::{Tables, sort_oldest_first};
use crate::task::{
    domain::{Revision, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;

/// Task repository over the shared [`InMemoryDatabase`].
///
/// Task visibility reads the parent project's members from the same
/// database, so pair it with the project repository built on the same
/// handle.
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository {
    database: InMemoryDatabase,
}

impl InMemoryTaskRepository {
    /// Creates a repository over `database`.
    #[must_use]
    pub const fn new(database: InMemoryDatabase) -> Self {
        Self { database }
    }

    fn visible(&self, visibility: Visibility) -> TaskRepositoryResult<Vec<Task>> {
        let tables = self
            .database
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        Ok(collect_visible(&tables, visibility))
    }
}

fn collect_visible(tables: &Tables, visibility: Visibility) -> Vec<Task> {
    let mut tasks: Vec<Task> = tables
        .tasks
        .values()
        .filter(|task| {
            tables
                .project_members_of(task)
                .is_some_and(|members| visibility.admits_task(task, members))
        })
        .cloned()
        .collect();
    sort_oldest_first(&mut tasks, |task| (task.created_at(), task.id()));
    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(TaskRepositoryError::persistence)?;

        if tables.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if !tables.projects.contains_key(&task.project_id()) {
            return Err(TaskRepositoryError::MissingProject(task.id()));
        }
        tables.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, expected: Revision) -> TaskRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(TaskRepositoryError::persistence)?;

        if !tables.projects.contains_key(&task.project_id()) {
            return Err(TaskRepositoryError::MissingProject(task.id()));
        }
        let stored = tables
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored.revision() != expected {
            return Err(TaskRepositoryError::RevisionConflict {
                id: task.id(),
                expected,
                actual: stored.revision(),
            });
        }
        *stored = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        tables
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tables = self
            .database
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        Ok(tables.tasks.get(&id).cloned())
    }

    async fn list(
        &self,
        visibility: Visibility,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        Ok(page.slice(self.visible(visibility)?))
    }

    async fn list_visible(&self, visibility: Visibility) -> TaskRepositoryResult<Vec<Task>> {
        self.visible(visibility)
    }
}
