use clap::Args;
use site_analytics::{Analytics, AnalyticsService};
use site_core::DatabaseConfig;
use tracing::{debug, info};

#[derive(Args)]
pub struct CleanupCommand {
    /// Database connection URL
    #[arg(long, env = "SITE_DATABASE_URL")]
    pub database_url: String,

    /// Delete events older than this many days
    #[arg(long, env = "SITE_RETENTION_DAYS")]
    pub older_than_days: i64,
}

impl CleanupCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        debug!("Initializing database connection...");
        let db = site_database::establish_connection(&DatabaseConfig::new(self.database_url))
            .await?;

        let service = AnalyticsService::new(db);
        let result = service.cleanup(self.older_than_days).await?;

        info!(
            "Deleted {} analytics events recorded before {}",
            result.deleted_count,
            site_core::millis_to_utc(result.cutoff)
                .map(|cutoff| cutoff.to_rfc3339())
                .unwrap_or_else(|| result.cutoff.to_string())
        );
        Ok(())
    }
}
