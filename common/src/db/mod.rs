use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::error::Result;

/// Database pool type
pub type DbPool = Pool<Postgres>;

/// Initialize a database connection pool from a connection string
///
/// The pool is constructed once at startup, owned by the sink, and reused
/// across cycles; reconnection after a transient failure happens inside
/// the pool on the next acquire.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}
