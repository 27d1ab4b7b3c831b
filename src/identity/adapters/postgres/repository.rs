//! `PostgreSQL` repository implementation for user accounts.

use super::models::{UserRow, UserWriteRow};
use crate::identity::{
    domain::{
        EmailAddress, PasswordHash, PersistedUserData, PhoneNumber, RoleSet, User, UserId,
        UserName,
    },
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::pagination::{Page, PageRequest};
use crate::store::postgres::{
    WorkboardPgPool, blocking::run_with_connection, schema::users,
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: WorkboardPgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkboardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_with_connection(&self.pool, f, UserRepositoryError::Persistence).await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let row = to_write_row(user)?;
        let user_id = user.id();
        let email = user.email().clone();

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, user_id, &email, true))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let row = to_write_row(user)?;
        let user_id = user.id();
        let email = user.email().clone();

        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.find(user_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, user_id, &email, false))?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        self.run_blocking(move |connection| {
            // Membership rows go with the user through ON DELETE CASCADE.
            let deleted = diesel::delete(users::table.find(id.into_inner()))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        UserRepositoryError::StillReferenced(id)
                    }
                    other => UserRepositoryError::persistence(other),
                })?;
            if deleted == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_many(&self, ids: &[UserId]) -> UserRepositoryResult<Vec<User>> {
        let raw_ids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            users::table
                .filter(users::id.eq_any(raw_ids))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?
                .into_iter()
                .map(row_to_user)
                .collect()
        })
        .await
    }

    async fn search(
        &self,
        term: Option<&str>,
        page: PageRequest,
    ) -> UserRepositoryResult<Page<User>> {
        let pattern = term.map(like_pattern);
        let limit = i64::from(page.per_page());
        let offset = i64::try_from(page.offset()).map_err(UserRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let count: i64 = filtered_users(pattern.clone())
                .count()
                .get_result(connection)
                .map_err(UserRepositoryError::persistence)?;
            let rows = filtered_users(pattern)
                .order((users::created_at.asc(), users::id.asc()))
                .limit(limit)
                .offset(offset)
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_user)
                .collect::<UserRepositoryResult<Vec<_>>>()?;
            let total = u64::try_from(count).map_err(UserRepositoryError::persistence)?;
            Ok(Page::new(items, page, total))
        })
        .await
    }

    async fn list_active(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            users::table
                .filter(users::is_active.eq(true))
                .order((users::name.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?
                .into_iter()
                .map(row_to_user)
                .collect()
        })
        .await
    }
}

fn map_write_error(
    err: DieselError,
    user_id: UserId,
    email: &EmailAddress,
    inserting: bool,
) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(EMAIL_UNIQUE_CONSTRAINT) =>
        {
            UserRepositoryError::DuplicateEmail(email.clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) if inserting => {
            UserRepositoryError::DuplicateUser(user_id)
        }
        _ => UserRepositoryError::persistence(err),
    }
}

fn filtered_users(pattern: Option<String>) -> users::BoxedQuery<'static, Pg> {
    let query = users::table.into_boxed();
    match pattern {
        Some(like) => query.filter(users::name.ilike(like.clone()).or(users::email.ilike(like))),
        None => query,
    }
}

/// Escapes `LIKE` wildcards in `term` and wraps it for substring matching.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn to_write_row(user: &User) -> UserRepositoryResult<UserWriteRow> {
    let roles = serde_json::to_value(user.roles()).map_err(UserRepositoryError::persistence)?;
    Ok(UserWriteRow {
        id: user.id().into_inner(),
        name: user.name().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        password_hash: user.password_hash().as_str().to_owned(),
        phone: user.phone().map(|phone| phone.as_str().to_owned()),
        is_active: user.is_active(),
        roles,
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    })
}

fn roles_from_value(value: Value) -> UserRepositoryResult<RoleSet> {
    if value.is_null() {
        return Ok(RoleSet::new());
    }
    let labels: Vec<String> =
        serde_json::from_value(value).map_err(UserRepositoryError::invalid_persisted_data)?;
    RoleSet::from_labels(labels).map_err(UserRepositoryError::invalid_persisted_data)
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        name,
        email,
        password_hash,
        phone,
        is_active,
        roles,
        created_at,
        updated_at,
    } = row;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        name: UserName::new(name).map_err(UserRepositoryError::invalid_persisted_data)?,
        email: EmailAddress::new(email).map_err(UserRepositoryError::invalid_persisted_data)?,
        password_hash: PasswordHash::new(password_hash),
        phone: PhoneNumber::parse_optional(phone)
            .map_err(UserRepositoryError::invalid_persisted_data)?,
        is_active,
        roles: roles_from_value(roles)?,
        created_at,
        updated_at,
    };
    Ok(User::from_persisted(data))
}
