use serde::Deserialize;
use serde_json::Value;
use site_core::EpochMillis;
use utoipa::ToSchema;

use super::RecordEvent;
use crate::window::TimeWindow;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordEventRequest {
    /// Event kind; required
    #[serde(default)]
    pub category: String,
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub session_id: Option<String>,
    pub metadata: Option<Value>,
}

impl From<RecordEventRequest> for RecordEvent {
    fn from(request: RecordEventRequest) -> Self {
        RecordEvent {
            category: request.category,
            path: request.path,
            referrer: request.referrer,
            user_agent: request.user_agent,
            ip_address: request.ip_address,
            session_id: request.session_id,
            metadata: request.metadata,
        }
    }
}

/// Optional inclusive time window, epoch milliseconds
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct WindowQuery {
    pub start: Option<EpochMillis>,
    pub end: Option<EpochMillis>,
}

impl From<WindowQuery> for TimeWindow {
    fn from(query: WindowQuery) -> Self {
        TimeWindow::new(query.start, query.end)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EventsByCategoryQuery {
    pub category: Option<String>,
    pub start: Option<EpochMillis>,
    pub end: Option<EpochMillis>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PageViewsQuery {
    pub path: Option<String>,
    pub start: Option<EpochMillis>,
    pub end: Option<EpochMillis>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CleanupRequest {
    pub older_than_days: Option<i64>,
}
