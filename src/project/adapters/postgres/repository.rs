//! `PostgreSQL` repository implementation for projects and memberships.

use super::models::{MemberRow, ProjectRow, ProjectWriteRow};
use crate::access::Visibility;
use crate::identity::domain::UserId;
use crate::pagination::{Page, PageRequest};
use crate::project::{
    domain::{MemberSet, PersistedProjectData, Project, ProjectId, ProjectStatus, Revision},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::schedule::DateRange;
use crate::store::postgres::{
    WorkboardPgPool,
    blocking::run_with_connection,
    schema::{project_members, projects},
};
use crate::validation::{Description, Title};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: WorkboardPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkboardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_with_connection(&self.pool, f, ProjectRepositoryError::Persistence).await
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let row = to_write_row(project)?;
        let members = member_rows(project);
        let project_id = project.id();

        self.run_blocking(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx| {
                diesel::insert_into(projects::table)
                    .values(&row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ProjectRepositoryError::DuplicateProject(project_id)
                        }
                        _ => ProjectRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(project_members::table)
                    .values(&members)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, project: &Project, expected: Revision) -> ProjectRepositoryResult<()> {
        let row = to_write_row(project)?;
        let members = member_rows(project);
        let project_id = project.id();
        let expected_value = revision_to_db(expected)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    projects::table
                        .filter(projects::id.eq(project_id.into_inner()))
                        .filter(projects::revision.eq(expected_value)),
                )
                .set(&row)
                .execute(tx)?;

                if updated == 0 {
                    let stored: Option<i64> = projects::table
                        .find(project_id.into_inner())
                        .select(projects::revision)
                        .first(tx)
                        .optional()?;
                    return Err(match stored {
                        None => ProjectRepositoryError::NotFound(project_id),
                        Some(actual) => ProjectRepositoryError::RevisionConflict {
                            id: project_id,
                            expected,
                            actual: revision_from_db(actual)?,
                        },
                    });
                }

                diesel::delete(
                    project_members::table
                        .filter(project_members::project_id.eq(project_id.into_inner())),
                )
                .execute(tx)?;
                diesel::insert_into(project_members::table)
                    .values(&members)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // Tasks and memberships follow through ON DELETE CASCADE.
            let deleted = diesel::delete(projects::table.find(id.into_inner()))
                .execute(connection)?;
            if deleted == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            match row {
                Some(found) => Ok(hydrate(connection, vec![found])?.into_iter().next()),
                None => Ok(None),
            }
        })
        .await
    }

    async fn list(
        &self,
        visibility: Visibility,
        page: PageRequest,
    ) -> ProjectRepositoryResult<Page<Project>> {
        let limit = i64::from(page.per_page());
        let offset = i64::try_from(page.offset()).map_err(ProjectRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let count: i64 = visible_projects(visibility).count().get_result(connection)?;
            let rows = visible_projects(visibility)
                .order((projects::created_at.asc(), projects::id.asc()))
                .limit(limit)
                .offset(offset)
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            let items = hydrate(connection, rows)?;
            let total = u64::try_from(count).map_err(ProjectRepositoryError::persistence)?;
            Ok(Page::new(items, page, total))
        })
        .await
    }

    async fn list_visible(&self, visibility: Visibility) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = visible_projects(visibility)
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            hydrate(connection, rows)
        })
        .await
    }
}

/// Projects admitted by `visibility` as a boxed query.
fn visible_projects(visibility: Visibility) -> projects::BoxedQuery<'static, Pg> {
    let query = projects::table.into_boxed();
    match visibility {
        Visibility::Unrestricted => query,
        Visibility::MemberOf(user) => query.filter(
            projects::id.eq_any(
                project_members::table
                    .filter(project_members::user_id.eq(user.into_inner()))
                    .select(project_members::project_id),
            ),
        ),
    }
}

/// Attaches member sets to loaded project rows, keeping row order.
fn hydrate(
    connection: &mut PgConnection,
    rows: Vec<ProjectRow>,
) -> ProjectRepositoryResult<Vec<Project>> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let memberships = project_members::table
        .filter(project_members::project_id.eq_any(ids))
        .select(MemberRow::as_select())
        .load::<MemberRow>(connection)?;

    let mut by_project: HashMap<Uuid, Vec<UserId>> = HashMap::new();
    for membership in memberships {
        by_project
            .entry(membership.project_id)
            .or_default()
            .push(UserId::from_uuid(membership.user_id));
    }

    rows.into_iter()
        .map(|row| {
            let members = by_project.remove(&row.id).unwrap_or_default();
            row_to_project(row, members)
        })
        .collect()
}

fn member_rows(project: &Project) -> Vec<MemberRow> {
    project
        .members()
        .iter()
        .map(|user| MemberRow {
            project_id: project.id().into_inner(),
            user_id: user.into_inner(),
        })
        .collect()
}

fn revision_to_db(revision: Revision) -> ProjectRepositoryResult<i64> {
    i64::try_from(revision.value()).map_err(ProjectRepositoryError::persistence)
}

fn revision_from_db(value: i64) -> ProjectRepositoryResult<Revision> {
    u64::try_from(value)
        .map(Revision::new)
        .map_err(ProjectRepositoryError::invalid_persisted_data)
}

fn to_write_row(project: &Project) -> ProjectRepositoryResult<ProjectWriteRow> {
    Ok(ProjectWriteRow {
        id: project.id().into_inner(),
        title: project.title().as_str().to_owned(),
        description: project.description().as_str().to_owned(),
        start_date: project.schedule().start(),
        end_date: project.schedule().end(),
        status: project.status().as_str().to_owned(),
        created_by: project.created_by().into_inner(),
        revision: revision_to_db(project.revision())?,
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    })
}

fn row_to_project(row: ProjectRow, members: Vec<UserId>) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        title,
        description,
        start_date,
        end_date,
        status,
        created_by,
        revision,
        created_at,
        updated_at,
    } = row;

    let data = PersistedProjectData {
        id: ProjectId::from_uuid(id),
        title: Title::new(title).map_err(ProjectRepositoryError::invalid_persisted_data)?,
        description: Description::new(description)
            .map_err(ProjectRepositoryError::invalid_persisted_data)?,
        schedule: DateRange::new(start_date, end_date)
            .map_err(ProjectRepositoryError::invalid_persisted_data)?,
        status: ProjectStatus::try_from(status.as_str())
            .map_err(ProjectRepositoryError::invalid_persisted_data)?,
        created_by: UserId::from_uuid(created_by),
        members: MemberSet::from_persisted(members),
        revision: revision_from_db(revision)?,
        created_at,
        updated_at,
    };
    Ok(Project::from_persisted(data))
}

#[cfg(test)]
mod tests {
    //! Unit tests for project row conversion.

    use super::*;
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
    }

    fn row(status: &str, start: &str, end: &str) -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            title: "Launch".to_owned(),
            description: "Ship it".to_owned(),
            start_date: date(start),
            end_date: date(end),
            status: status.to_owned(),
            created_by: Uuid::new_v4(),
            revision: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn row_converts_with_members_and_revision() {
        let member = UserId::new();
        let project = row_to_project(row("in_progress", "2025-01-01", "2025-01-31"), vec![member])
            .expect("row converts");

        assert_eq!(project.status(), ProjectStatus::InProgress);
        assert_eq!(project.revision(), Revision::new(3));
        assert!(project.is_member(member));

        let written = to_write_row(&project).expect("project converts");
        assert_eq!(written.status, "in_progress");
        assert_eq!(written.revision, 3);
        assert_eq!(member_rows(&project).len(), 1);
    }

    #[rstest]
    fn project_without_members_still_loads() {
        let project = row_to_project(row("pending", "2025-01-01", "2025-01-31"), Vec::new())
            .expect("row converts");
        assert!(project.members().is_empty());
    }

    #[rstest]
    #[case("archived", "2025-01-01", "2025-01-31")]
    #[case("pending", "2025-01-31", "2025-01-01")]
    fn invalid_rows_are_reported(#[case] status: &str, #[case] start: &str, #[case] end: &str) {
        let result = row_to_project(row(status, start, end), Vec::new());
        assert!(matches!(
            result,
            Err(ProjectRepositoryError::InvalidPersistedData(_))
        ));
    }

    #[rstest]
    fn negative_revision_is_invalid_persisted_data() {
        assert!(matches!(
            revision_from_db(-1),
            Err(ProjectRepositoryError::InvalidPersistedData(_))
        ));
    }
}
