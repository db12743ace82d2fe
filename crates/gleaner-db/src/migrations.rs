//! Database migration management.
//!
//! Embeds SQL migrations and provides functions to apply them automatically.
//! Uses `SQLx`'s built-in migration support with compile-time embedding.

use crate::error::{DatabaseError, Result};
use sqlx::{Pool, Sqlite};

/// Run all pending database migrations.
///
/// Applies every migration in the `migrations/` directory that hasn't been
/// applied yet; `SQLx` tracks applied migrations in a `_sqlx_migrations`
/// table, so repeated calls are no-ops.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(format!("migration execution failed: {e}")))?;

    Ok(())
}

/// Get the current schema version (the highest applied migration version,
/// or 0 when none have been applied yet).
pub async fn get_schema_version(pool: &Pool<Sqlite>) -> Result<i64> {
    let table_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?
        > 0;

    if !table_exists {
        return Ok(0);
    }

    let version =
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(version), 0) FROM _sqlx_migrations")
            .fetch_optional(pool)
            .await?
            .unwrap_or(0);

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_run_migrations() {
        let db = Database::new(":memory:").await.expect("create database");
        run_migrations(db.pool()).await.expect("run migrations");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name"
        )
        .fetch_all(db.pool())
        .await
        .expect("query tables");

        assert_eq!(tables, vec!["offers"]);
    }

    #[tokio::test]
    async fn test_get_schema_version() {
        let db = Database::new(":memory:").await.expect("create database");

        let version = get_schema_version(db.pool()).await.expect("get version");
        assert_eq!(version, 0);

        run_migrations(db.pool()).await.expect("run migrations");

        let version = get_schema_version(db.pool()).await.expect("get version");
        assert_eq!(version, 1);
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let db = Database::new(":memory:").await.expect("create database");

        run_migrations(db.pool()).await.expect("first migration run");
        run_migrations(db.pool())
            .await
            .expect("second migration run should be idempotent");

        let version = get_schema_version(db.pool()).await.expect("get version");
        assert_eq!(version, 1);
    }
}
