use site_analytics::Analytics;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Periodically runs the retention sweep until cancelled.
pub struct RetentionScheduler {
    analytics: Arc<dyn Analytics>,
    older_than_days: i64,
    interval: Duration,
}

impl RetentionScheduler {
    pub fn new(analytics: Arc<dyn Analytics>, older_than_days: i64, interval: Duration) -> Self {
        Self {
            analytics,
            older_than_days,
            interval,
        }
    }

    /// One sweep; failures are logged and the next tick tries again.
    pub async fn tick(&self) -> u64 {
        match self.analytics.cleanup(self.older_than_days).await {
            Ok(result) => {
                debug!(
                    "Scheduled retention sweep deleted {} events",
                    result.deleted_count
                );
                result.deleted_count
            }
            Err(e) => {
                warn!("Scheduled retention sweep failed: {}", e);
                0
            }
        }
    }

    pub async fn run(self, cancellation_token: CancellationToken) {
        info!(
            "Retention scheduler keeps {} days, sweeping every {:?}",
            self.older_than_days, self.interval
        );
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    debug!("Retention scheduler stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }
}
