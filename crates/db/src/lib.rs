//! SQLite access layer: pool construction, migrations, and repositories.

pub mod models;
pub mod repositories;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Convenience alias so callers don't import sqlx directly for the type.
pub type DbPool = SqlitePool;

/// Maximum connections in the pool.
///
/// SQLite serializes writes internally; a small pool is plenty for a
/// single-user backend.
const MAX_CONNECTIONS: u32 = 5;

/// Create a connection pool for the given SQLite URL.
///
/// The database file is created if it does not exist, matching the
/// original deployment where first boot provisions the store.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
}

/// Verify the database is reachable with a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_pool_passes_health_check() {
        let pool = create_pool("sqlite::memory:")
            .await
            .expect("pool should connect");
        health_check(&pool).await.expect("health check should pass");
    }

    #[tokio::test]
    async fn migrations_apply_cleanly() {
        let pool = create_pool("sqlite::memory:")
            .await
            .expect("pool should connect");
        run_migrations(&pool).await.expect("migrations should run");

        // The users table must exist afterwards.
        health_check(&pool).await.unwrap();
        sqlx::query("SELECT COUNT(*) FROM users")
            .execute(&pool)
            .await
            .expect("users table should exist");
    }
}
