use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use site_core::{Clock, SystemClock, MILLIS_PER_DAY};
use std::sync::Arc;
use tracing::{debug, info};

use crate::retention;
use crate::snapshot::Snapshot;
use crate::store::{EventStore, SeaOrmEventStore};
use crate::traits::Analytics;
use crate::types::responses::{CleanupResult, ConversionFunnel, DashboardSummary, RealtimeSummary};
use crate::types::{AnalyticsError, AnalyticsEvent, EventCategory, RecordEvent};
use crate::window::TimeWindow;

pub struct AnalyticsService {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self::with_parts(Arc::new(SeaOrmEventStore::new(db)), Arc::new(SystemClock))
    }

    pub fn with_parts(store: Arc<dyn EventStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Pull events once for a windowed query and pin `now` for it.
    async fn snapshot(&self, window: TimeWindow) -> Result<Snapshot, AnalyticsError> {
        let now = self.clock.now_millis();
        let events = self.store.scan_since(window.start).await?;
        let snapshot = Snapshot::collect(now, events, &window);
        debug!(
            "Snapshot at {} holds {} events for {:?}",
            now,
            snapshot.len(),
            window
        );
        Ok(snapshot)
    }
}

/// Rejects empty and whitespace-only values. Accepted values are used as given.
fn require(value: &str, field: &str) -> Result<(), AnalyticsError> {
    if value.trim().is_empty() {
        return Err(AnalyticsError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn newest_first(events: &mut [AnalyticsEvent]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl Analytics for AnalyticsService {
    async fn record_event(&self, event: RecordEvent) -> Result<i32, AnalyticsError> {
        require(&event.category, "category")?;
        let timestamp = self.clock.now_millis();

        let id = self.store.insert(event, timestamp).await?;
        debug!("Recorded analytics event {} at {}", id, timestamp);
        Ok(id)
    }

    async fn events_by_category(
        &self,
        category: &str,
        window: TimeWindow,
        limit: Option<u64>,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        require(category, "category")?;

        let mut events = window.filter(self.store.scan_category(category).await?);
        newest_first(&mut events);
        if let Some(limit) = limit {
            events.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(events)
    }

    async fn page_views(
        &self,
        path: Option<&str>,
        window: TimeWindow,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        let mut events = window.filter(
            self.store
                .scan_category(EventCategory::PageView.as_str())
                .await?,
        );
        if let Some(path) = path {
            events.retain(|event| event.path.as_deref() == Some(path));
        }
        newest_first(&mut events);
        Ok(events)
    }

    async fn dashboard(&self, window: TimeWindow) -> Result<DashboardSummary, AnalyticsError> {
        Ok(self.snapshot(window).await?.dashboard())
    }

    async fn realtime(&self) -> Result<RealtimeSummary, AnalyticsError> {
        let now = self.clock.now_millis();
        let window = TimeWindow::since(now - MILLIS_PER_DAY);
        let events = self.store.scan_since(window.start).await?;
        Ok(Snapshot::collect(now, events, &window).realtime())
    }

    async fn user_journey(
        &self,
        session_id: &str,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        require(session_id, "session_id")?;

        let mut events = self.store.scan_session(session_id).await?;
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn conversion_funnel(
        &self,
        window: TimeWindow,
    ) -> Result<ConversionFunnel, AnalyticsError> {
        Ok(self.snapshot(window).await?.funnel())
    }

    async fn cleanup(&self, older_than_days: i64) -> Result<CleanupResult, AnalyticsError> {
        let now = self.clock.now_millis();
        let cutoff = retention::cutoff(now, older_than_days)?;

        let deleted_count = retention::sweep(self.store.as_ref(), cutoff).await?;
        info!(
            "Retention sweep removed {} events older than {} days",
            deleted_count, older_than_days
        );
        Ok(CleanupResult {
            deleted_count,
            cutoff,
        })
    }
}
