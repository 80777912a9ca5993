//! Inclusive time windows over event timestamps
//!
//! Every operation that accepts a date range narrows its events through
//! [`TimeWindow::contains`], so dashboard totals, funnel counts and page-view
//! lists agree over the same window.

use serde::Deserialize;
use site_core::EpochMillis;
use utoipa::ToSchema;

use crate::types::AnalyticsEvent;

/// `start <= timestamp <= end`, each bound optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct TimeWindow {
    pub start: Option<EpochMillis>,
    pub end: Option<EpochMillis>,
}

impl TimeWindow {
    pub fn new(start: Option<EpochMillis>, end: Option<EpochMillis>) -> Self {
        Self { start, end }
    }

    /// No bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn since(start: EpochMillis) -> Self {
        Self::new(Some(start), None)
    }

    pub fn contains(&self, timestamp: EpochMillis) -> bool {
        self.start.map_or(true, |start| start <= timestamp)
            && self.end.map_or(true, |end| timestamp <= end)
    }

    /// Keep only the events inside the window, preserving order.
    pub fn filter(&self, events: Vec<AnalyticsEvent>) -> Vec<AnalyticsEvent> {
        events
            .into_iter()
            .filter(|event| self.contains(event.timestamp))
            .collect()
    }
}
