//! Blocking operation helpers for the `PostgreSQL` repositories.
//!
//! Diesel is synchronous. Every repository call checks out a pooled
//! connection and runs on Tokio's blocking thread pool so the async
//! executor's worker threads never wait on the database.

use super::WorkboardPgPool;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, PoolError, PooledConnection};
use std::sync::Arc;

/// Shared error payload accepted by every repository error's persistence
/// variant.
pub(crate) type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Pooled connection type for internal use.
pub(crate) type PooledConn = PooledConnection<ConnectionManager<PgConnection>>;

/// Checks out a connection and runs `f` on the blocking pool.
///
/// Pool and join failures are wrapped by `wrap`, normally the caller's
/// `Persistence` variant constructor.
pub(crate) async fn run_with_connection<F, T, E, M>(
    pool: &WorkboardPgPool,
    f: F,
    wrap: M,
) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: Fn(SharedError) -> E + Send + Copy + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = get_conn_with(&pool, |err| wrap(Arc::new(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| wrap(Arc::new(err)))?
}

/// Obtains a connection from the pool with a caller-provided error mapper.
pub(crate) fn get_conn_with<E, M>(pool: &WorkboardPgPool, map_err: M) -> Result<PooledConn, E>
where
    M: FnOnce(PoolError) -> E,
{
    pool.get().map_err(map_err)
}
