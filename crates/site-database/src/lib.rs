//! Database connection and test utilities

pub use sea_orm;
mod connection;

pub use connection::{establish_connection, DbConnection};

// Export test utilities for use by other crates in their tests
pub mod test_utils;

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Statement};
    use site_core::DatabaseConfig;

    #[tokio::test]
    async fn test_establish_connection_runs_migrations() -> anyhow::Result<()> {
        let db = establish_connection(&DatabaseConfig::new("sqlite::memory:")).await?;

        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM analytics_events".to_owned(),
            ))
            .await?;
        let count: i64 = row
            .ok_or_else(|| anyhow::anyhow!("no row returned"))?
            .try_get("", "n")?;
        assert_eq!(count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_establish_connection_rejects_bad_url() {
        let result = establish_connection(&DatabaseConfig::new("nosuchdriver://nowhere")).await;
        assert!(matches!(result, Err(site_core::ServiceError::Connection(_))));
    }
}
