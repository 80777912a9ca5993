mod retention;
mod server;

use clap::Args;
use site_analytics::AnalyticsService;
use site_core::DatabaseConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use retention::RetentionScheduler;
pub use server::build_application;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "SITE_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "SITE_DATABASE_URL")]
    pub database_url: String,

    /// Maximum number of pooled database connections
    #[arg(long, default_value_t = 10, env = "SITE_MAX_CONNECTIONS")]
    pub max_connections: u32,

    /// Delete events older than this many days in the background
    #[arg(long, env = "SITE_RETENTION_DAYS")]
    pub retention_days: Option<i64>,

    /// Seconds between background retention sweeps
    #[arg(long, default_value_t = 3600, env = "SITE_RETENTION_INTERVAL_SECS")]
    pub retention_interval_secs: u64,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        if matches!(self.retention_days, Some(days) if days < 0) {
            anyhow::bail!("--retention-days must not be negative");
        }

        let db_config =
            DatabaseConfig::new(self.database_url.clone()).with_max_connections(self.max_connections);

        debug!("Initializing database connection...");
        let db = site_database::establish_connection(&db_config).await?;
        let analytics_service = Arc::new(AnalyticsService::new(db));

        let shutdown = CancellationToken::new();

        if let Some(days) = self.retention_days {
            let scheduler = RetentionScheduler::new(
                analytics_service.clone(),
                days,
                Duration::from_secs(self.retention_interval_secs.max(1)),
            );
            let token = shutdown.clone();
            tokio::spawn(async move { scheduler.run(token).await });
            debug!("Retention scheduler started in background");
        }

        let app = build_application(analytics_service);

        let listener = TcpListener::bind(&self.address).await?;
        info!("Site API server listening on {}", self.address);

        let server_token = shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Shutdown requested");
                server_token.cancel();
            })
            .await?;

        shutdown.cancel();
        info!("Site API server exited");
        Ok(())
    }
}
