use serde::{Deserialize, Serialize};
use site_core::EpochMillis;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::AnalyticsEvent;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordEventResponse {
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageCount {
    pub path: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReferrerCount {
    pub referrer: String,
    pub count: u64,
}

/// One day of the dashboard time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DailyStat {
    /// Calendar date (UTC) of the bucket start, `YYYY-MM-DD`
    pub date: String,
    pub bucket_start: EpochMillis,
    pub page_views: u64,
    pub contacts: u64,
    pub inquiries: u64,
    pub total: u64,
}

/// One hour of the real-time time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HourlyStat {
    /// Hour of day (UTC) of the bucket start, 0-23
    pub hour: u32,
    pub bucket_start: EpochMillis,
    pub page_views: u64,
    pub contacts: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub total_events: u64,
    pub total_page_views: u64,
    pub total_contacts: u64,
    pub total_service_inquiries: u64,
    /// Event count for every category seen in the window, recognized or not
    pub events_by_category: BTreeMap<String, u64>,
    pub top_pages: Vec<PageCount>,
    pub top_referrers: Vec<ReferrerCount>,
    /// 30 rows, oldest first
    pub daily_stats: Vec<DailyStat>,
    pub unique_sessions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RealtimeSummary {
    /// Events in the last 24 hours
    pub total_events: u64,
    /// 24 rows, oldest first
    pub hourly_stats: Vec<HourlyStat>,
    /// Newest first
    pub recent_events: Vec<AnalyticsEvent>,
}

/// Conversion funnel step counts and the rates derived from them.
///
/// Rates are percentages with two fractional digits, or `"0"` when the
/// denominator is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConversionFunnel {
    pub page_views: u64,
    pub service_views: u64,
    pub portfolio_views: u64,
    pub contact_page_views: u64,
    pub contact_submissions: u64,
    #[schema(example = "12.50")]
    pub service_view_rate: String,
    pub portfolio_view_rate: String,
    pub contact_page_rate: String,
    pub contact_submission_rate: String,
    pub overall_conversion_rate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CleanupResult {
    pub deleted_count: u64,
    /// Events strictly older than this instant were removed
    pub cutoff: EpochMillis,
}
