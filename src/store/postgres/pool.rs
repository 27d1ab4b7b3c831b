//! Connection pool construction.

use crate::config::DatabaseConfig;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool shared by every Diesel repository.
pub type WorkboardPgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a pool and opens its initial connections.
///
/// # Errors
///
/// Returns [`PoolError`] when the database cannot be reached.
pub fn build_pool(config: &DatabaseConfig) -> Result<WorkboardPgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(config.url.as_str());
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .build(manager)?;
    tracing::info!(
        max_connections = config.max_connections,
        "database connection pool ready"
    );
    Ok(pool)
}
