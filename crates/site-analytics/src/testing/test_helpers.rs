//! Builders for hand-made events and a service wired to an in-memory store

use std::sync::Arc;

use site_core::{EpochMillis, FixedClock};
use site_database::test_utils::TestDatabase;

use crate::store::SeaOrmEventStore;
use crate::types::{AnalyticsEvent, EventCategory};
use crate::AnalyticsService;

/// 2024-03-10T15:30:00Z
pub const TEST_NOW: EpochMillis = 1_710_084_600_000;

pub fn event_at(id: i32, category: &str, timestamp: EpochMillis) -> AnalyticsEvent {
    AnalyticsEvent {
        id,
        category: EventCategory::from(category),
        path: None,
        referrer: None,
        user_agent: None,
        ip_address: None,
        session_id: None,
        metadata: None,
        timestamp,
    }
}

pub fn page_view(id: i32, path: &str, timestamp: EpochMillis) -> AnalyticsEvent {
    AnalyticsEvent {
        path: Some(path.to_string()),
        ..event_at(id, "page_view", timestamp)
    }
}

pub fn in_session(mut event: AnalyticsEvent, session_id: &str) -> AnalyticsEvent {
    event.session_id = Some(session_id.to_string());
    event
}

pub fn from_referrer(mut event: AnalyticsEvent, referrer: &str) -> AnalyticsEvent {
    event.referrer = Some(referrer.to_string());
    event
}

/// A service over a fresh in-memory database and a clock frozen at
/// `TEST_NOW`.
pub struct TestService {
    pub service: Arc<AnalyticsService>,
    pub clock: Arc<FixedClock>,
    pub test_db: TestDatabase,
}

impl TestService {
    pub async fn new() -> anyhow::Result<Self> {
        let test_db = TestDatabase::with_migrations().await?;
        let clock = Arc::new(FixedClock::new(TEST_NOW));
        let store = Arc::new(SeaOrmEventStore::new(test_db.db.clone()));
        let service = Arc::new(AnalyticsService::with_parts(store, clock.clone()));

        Ok(Self {
            service,
            clock,
            test_db,
        })
    }
}
