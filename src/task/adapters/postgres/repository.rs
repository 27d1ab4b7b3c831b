//! `PostgreSQL` repository implementation for tasks.

use super::models::{TaskRow, TaskWriteRow};
use crate::access::Visibility;
use crate::identity::domain::UserId;
use crate::pagination::{Page, PageRequest};
use crate::project::domain::ProjectId;
use crate::schedule::DateRange;
use crate::store::postgres::{
    WorkboardPgPool,
    blocking::run_with_connection,
    schema::{project_members, tasks},
};
use crate::task::{
    domain::{PersistedTaskData, Revision, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::validation::{Description, Title};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: WorkboardPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkboardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_with_connection(&self.pool, f, TaskRepositoryError::Persistence).await
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let row = to_write_row(task)?;
        let task_id = task.id();

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, task_id))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, expected: Revision) -> TaskRepositoryResult<()> {
        let row = to_write_row(task)?;
        let task_id = task.id();
        let expected_value = revision_to_db(expected)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(task_id.into_inner()))
                        .filter(tasks::revision.eq(expected_value)),
                )
                .set(&row)
                .execute(tx)
                .map_err(|err| map_write_error(err, task_id))?;
                if updated > 0 {
                    return Ok(());
                }

                let stored: Option<i64> = tasks::table
                    .find(task_id.into_inner())
                    .select(tasks::revision)
                    .first(tx)
                    .optional()?;
                Err(match stored {
                    None => TaskRepositoryError::NotFound(task_id),
                    Some(actual) => TaskRepositoryError::RevisionConflict {
                        id: task_id,
                        expected,
                        actual: revision_from_db(actual)?,
                    },
                })
            })
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(
        &self,
        visibility: Visibility,
        page: PageRequest,
    ) -> TaskRepositoryResult<Page<Task>> {
        let limit = i64::from(page.per_page());
        let offset = i64::try_from(page.offset()).map_err(TaskRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let count: i64 = visible_tasks(visibility).count().get_result(connection)?;
            let items = visible_tasks(visibility)
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .limit(limit)
                .offset(offset)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            let total = u64::try_from(count).map_err(TaskRepositoryError::persistence)?;
            Ok(Page::new(items, page, total))
        })
        .await
    }

    async fn list_visible(&self, visibility: Visibility) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            visible_tasks(visibility)
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }
}

/// Tasks admitted by `visibility`: assigned to, created by, or inside a
/// project shared with the user.
fn visible_tasks(visibility: Visibility) -> tasks::BoxedQuery<'static, Pg> {
    let query = tasks::table.into_boxed();
    match visibility {
        Visibility::Unrestricted => query,
        Visibility::MemberOf(user) => {
            let user_uuid = user.into_inner();
            query.filter(
                tasks::assigned_user_id
                    .eq(user_uuid)
                    .or(tasks::created_by.eq(user_uuid))
                    .or(tasks::project_id.eq_any(
                        project_members::table
                            .filter(project_members::user_id.eq(user_uuid))
                            .select(project_members::project_id),
                    )),
            )
        }
    }
}

fn map_write_error(err: DieselError, task_id: TaskId) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TaskRepositoryError::DuplicateTask(task_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            TaskRepositoryError::MissingProject(task_id)
        }
        _ => TaskRepositoryError::persistence(err),
    }
}

fn revision_to_db(revision: Revision) -> TaskRepositoryResult<i64> {
    i64::try_from(revision.value()).map_err(TaskRepositoryError::persistence)
}

fn revision_from_db(value: i64) -> TaskRepositoryResult<Revision> {
    u64::try_from(value)
        .map(Revision::new)
        .map_err(TaskRepositoryError::invalid_persisted_data)
}

fn to_write_row(task: &Task) -> TaskRepositoryResult<TaskWriteRow> {
    Ok(TaskWriteRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().as_str().to_owned(),
        start_date: task.schedule().start(),
        end_date: task.schedule().end(),
        status: task.status().as_str().to_owned(),
        project_id: task.project_id().into_inner(),
        assigned_user_id: task.assigned_to().into_inner(),
        created_by: task.created_by().into_inner(),
        revision: revision_to_db(task.revision())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        start_date,
        end_date,
        status,
        project_id,
        assigned_user_id,
        created_by,
        revision,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: Title::new(title).map_err(TaskRepositoryError::invalid_persisted_data)?,
        description: Description::new(description)
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        schedule: DateRange::new(start_date, end_date)
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        status: TaskStatus::try_from(status.as_str())
            .map_err(TaskRepositoryError::invalid_persisted_data)?,
        project_id: ProjectId::from_uuid(project_id),
        assigned_to: UserId::from_uuid(assigned_user_id),
        created_by: UserId::from_uuid(created_by),
        revision: revision_from_db(revision)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
