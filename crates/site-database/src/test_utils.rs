//! Test utilities for database integration tests
//!
//! Every `TestDatabase` is a private in-memory SQLite database with all
//! migrations applied, so tests never share state and need no external
//! services.

use crate::DbConnection;
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use site_migrations::Migrator;
use std::sync::Arc;

pub struct TestDatabase {
    pub db: Arc<DbConnection>,
}

impl TestDatabase {
    /// Open an empty in-memory database without running migrations.
    pub async fn new() -> anyhow::Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        // Each in-memory connection is its own database.
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open in-memory database: {}", e))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database with the full schema.
    pub async fn with_migrations() -> anyhow::Result<Self> {
        let test_db = Self::new().await?;
        Migrator::up(test_db.db.as_ref(), None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
        Ok(test_db)
    }

    /// Count the rows of a table.
    pub async fn count_rows(&self, table: &str) -> anyhow::Result<i64> {
        let sql = format!("SELECT COUNT(*) AS n FROM {}", table);
        let row = self
            .db
            .query_one(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await?
            .ok_or_else(|| anyhow::anyhow!("COUNT returned no row"))?;
        Ok(row.try_get("", "n")?)
    }
}
