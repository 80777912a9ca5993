//! Database connection management

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use site_core::{DatabaseConfig, ServiceError, ServiceResult};
use site_migrations::Migrator;
use std::sync::Arc;
use tracing::{debug, info};

pub type DbConnection = DatabaseConnection;

/// Connect to the configured database and apply pending migrations.
pub async fn establish_connection(config: &DatabaseConfig) -> ServiceResult<Arc<DbConnection>> {
    let mut opt = ConnectOptions::new(config.url.clone());
    if config.is_in_memory() {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections);
    }
    opt.sqlx_logging(false);

    debug!("Connecting to database");
    let db = Database::connect(opt)
        .await
        .map_err(|e| ServiceError::Connection(e.to_string()))?;

    debug!("Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| ServiceError::Migration(e.to_string()))?;

    info!("Database ready ({:?})", db.get_database_backend());
    Ok(Arc::new(db))
}
