//! Shared helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use eyre::WrapErr;
use mockable::DefaultClock;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use workboard::access::Actor;
use workboard::config::DatabaseConfig;
use workboard::identity::{
    adapters::postgres::PostgresUserRepository,
    domain::{EmailAddress, NewUser, PasswordHash, Role, User, UserName},
    ports::UserRepository,
};
use workboard::store::postgres::{WorkboardPgPool, build_pool};

/// Variable naming the scratch database.
pub const TEST_DATABASE_URL_VAR: &str = "WORKBOARD_TEST_DATABASE_URL";

/// SQL creating the schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2025-06-01-000000_create_workboard_tables/up.sql");

/// SQL dropping the schema.
pub const DROP_SCHEMA_SQL: &str =
    include_str!("../../migrations/2025-06-01-000000_create_workboard_tables/down.sql");

static DATABASE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Pool over a freshly migrated scratch database.
///
/// Holds a process-wide lock so tests sharing the database run one at a
/// time.
pub struct ScratchDatabase {
    pub pool: WorkboardPgPool,
    _lock: MutexGuard<'static, ()>,
}

/// Resets the scratch database and returns a pool, or `None` when no
/// database is configured.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or migrated.
pub fn scratch_database() -> eyre::Result<Option<ScratchDatabase>> {
    let Ok(url) = std::env::var(TEST_DATABASE_URL_VAR) else {
        return Ok(None);
    };
    let lock = DATABASE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let pool = build_pool(&DatabaseConfig {
        url,
        max_connections: 2,
    })
    .wrap_err("connect to scratch database")?;
    let mut connection = pool.get().wrap_err("check out connection")?;
    connection
        .batch_execute(DROP_SCHEMA_SQL)
        .wrap_err("drop schema")?;
    connection
        .batch_execute(CREATE_SCHEMA_SQL)
        .wrap_err("create schema")?;

    Ok(Some(ScratchDatabase { pool, _lock: lock }))
}

/// Stores an active account and returns it as an actor.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn seed_user(
    users: &PostgresUserRepository,
    name: &str,
    roles: &[Role],
) -> eyre::Result<Actor> {
    let user = User::new(
        NewUser {
            name: UserName::new(name)?,
            email: EmailAddress::new(format!("{}@example.com", name.to_lowercase()))?,
            password_hash: PasswordHash::new("$argon2id$placeholder"),
            phone: None,
            is_active: true,
            roles: roles.iter().copied().collect(),
        },
        &DefaultClock,
    );
    users.store(&user).await?;
    Ok(Actor::from(&user))
}
