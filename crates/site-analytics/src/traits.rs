use async_trait::async_trait;

use crate::types::responses::{CleanupResult, ConversionFunnel, DashboardSummary, RealtimeSummary};
use crate::types::{AnalyticsError, AnalyticsEvent, RecordEvent};
use crate::window::TimeWindow;

/// Analytics operations: event ingestion and the aggregate queries over it
#[async_trait]
pub trait Analytics: Send + Sync {
    /// Validate and append one event; returns its id
    async fn record_event(&self, event: RecordEvent) -> Result<i32, AnalyticsError>;

    /// Events of one category in the window, newest first, at most `limit`
    async fn events_by_category(
        &self,
        category: &str,
        window: TimeWindow,
        limit: Option<u64>,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError>;

    /// Page views in the window, optionally for one path, newest first
    async fn page_views(
        &self,
        path: Option<&str>,
        window: TimeWindow,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError>;

    /// Totals, top pages and referrers, daily series and unique sessions
    async fn dashboard(&self, window: TimeWindow) -> Result<DashboardSummary, AnalyticsError>;

    /// Last 24 hours: count, hourly series and the newest events
    async fn realtime(&self) -> Result<RealtimeSummary, AnalyticsError>;

    /// Every event of a session, oldest first
    async fn user_journey(&self, session_id: &str)
        -> Result<Vec<AnalyticsEvent>, AnalyticsError>;

    /// Contact funnel step counts and rates in the window
    async fn conversion_funnel(
        &self,
        window: TimeWindow,
    ) -> Result<ConversionFunnel, AnalyticsError>;

    /// Delete events older than `older_than_days` days
    async fn cleanup(&self, older_than_days: i64) -> Result<CleanupResult, AnalyticsError>;
}
