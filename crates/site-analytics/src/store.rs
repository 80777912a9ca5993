//! Event store: append, index-scoped scans, delete
//!
//! Scans return events ordered by `(timestamp, id)` ascending, so events that
//! share a millisecond keep their ingestion order.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use site_core::EpochMillis;
use site_entities::analytics_events::{self, ActiveModel, Entity as AnalyticsEvents};
use std::sync::Arc;

use crate::types::{AnalyticsError, AnalyticsEvent, RecordEvent};

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one event stamped with `timestamp`, returning its id.
    async fn insert(
        &self,
        event: RecordEvent,
        timestamp: EpochMillis,
    ) -> Result<i32, AnalyticsError>;

    /// Events with `timestamp >= start` (all events when `start` is `None`),
    /// via the timestamp index.
    async fn scan_since(
        &self,
        start: Option<EpochMillis>,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError>;

    /// Events of one category, via the category index.
    async fn scan_category(&self, category: &str) -> Result<Vec<AnalyticsEvent>, AnalyticsError>;

    /// Events of one browsing session.
    async fn scan_session(&self, session_id: &str)
        -> Result<Vec<AnalyticsEvent>, AnalyticsError>;

    /// Ids of events with `timestamp < cutoff`, oldest first.
    async fn scan_ids_before(&self, cutoff: EpochMillis) -> Result<Vec<i32>, AnalyticsError>;

    /// Delete one event. Returns false if it was already gone.
    async fn delete(&self, id: i32) -> Result<bool, AnalyticsError>;
}

pub struct SeaOrmEventStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEventStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn chronological(query: Select<AnalyticsEvents>) -> Select<AnalyticsEvents> {
        query
            .order_by_asc(analytics_events::Column::Timestamp)
            .order_by_asc(analytics_events::Column::Id)
    }

    async fn fetch(
        &self,
        query: Select<AnalyticsEvents>,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        let rows = Self::chronological(query).all(self.db.as_ref()).await?;
        Ok(rows.into_iter().map(AnalyticsEvent::from).collect())
    }
}

#[async_trait]
impl EventStore for SeaOrmEventStore {
    async fn insert(
        &self,
        event: RecordEvent,
        timestamp: EpochMillis,
    ) -> Result<i32, AnalyticsError> {
        let metadata = event
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AnalyticsError::Other(format!("Failed to encode metadata: {}", e)))?;

        let model = ActiveModel {
            category: Set(event.category),
            path: Set(event.path),
            referrer: Set(event.referrer),
            user_agent: Set(event.user_agent),
            ip_address: Set(event.ip_address),
            session_id: Set(event.session_id),
            metadata: Set(metadata),
            timestamp: Set(timestamp),
            ..Default::default()
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.id)
    }

    async fn scan_since(
        &self,
        start: Option<EpochMillis>,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        let mut query = AnalyticsEvents::find();
        if let Some(start) = start {
            query = query.filter(analytics_events::Column::Timestamp.gte(start));
        }
        self.fetch(query).await
    }

    async fn scan_category(&self, category: &str) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        self.fetch(AnalyticsEvents::find().filter(analytics_events::Column::Category.eq(category)))
            .await
    }

    async fn scan_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<AnalyticsEvent>, AnalyticsError> {
        self.fetch(
            AnalyticsEvents::find().filter(analytics_events::Column::SessionId.eq(session_id)),
        )
        .await
    }

    async fn scan_ids_before(&self, cutoff: EpochMillis) -> Result<Vec<i32>, AnalyticsError> {
        let ids = AnalyticsEvents::find()
            .select_only()
            .column(analytics_events::Column::Id)
            .filter(analytics_events::Column::Timestamp.lt(cutoff))
            .order_by_asc(analytics_events::Column::Timestamp)
            .order_by_asc(analytics_events::Column::Id)
            .into_tuple::<i32>()
            .all(self.db.as_ref())
            .await?;
        Ok(ids)
    }

    async fn delete(&self, id: i32) -> Result<bool, AnalyticsError> {
        let result = AnalyticsEvents::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventCategory;
    use site_database::test_utils::TestDatabase;

    async fn store() -> (SeaOrmEventStore, TestDatabase) {
        let test_db = TestDatabase::with_migrations()
            .await
            .expect("Failed to create test database");
        (SeaOrmEventStore::new(test_db.db.clone()), test_db)
    }

    #[tokio::test]
    async fn test_insert_and_scan_round_trip() {
        let (store, _db) = store().await;

        let id = store
            .insert(
                RecordEvent::new("page_view")
                    .path("/pricing")
                    .referrer("https://news.ycombinator.com")
                    .session("s-1")
                    .metadata(serde_json::json!({"campaign": "spring"})),
                1_000,
            )
            .await
            .unwrap();
        assert!(id > 0);

        let events = store.scan_since(None).await.unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, id);
        assert_eq!(event.category, EventCategory::PageView);
        assert_eq!(event.path.as_deref(), Some("/pricing"));
        assert_eq!(event.session_id.as_deref(), Some("s-1"));
        assert_eq!(event.metadata, Some(serde_json::json!({"campaign": "spring"})));
        assert_eq!(event.timestamp, 1_000);
    }

    #[tokio::test]
    async fn test_scans_are_chronological_with_id_tiebreak() {
        let (store, _db) = store().await;

        let late = store.insert(RecordEvent::new("page_view"), 300).await.unwrap();
        let first_tie = store.insert(RecordEvent::new("page_view"), 100).await.unwrap();
        let second_tie = store.insert(RecordEvent::new("page_view"), 100).await.unwrap();

        let ids: Vec<i32> = store
            .scan_since(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![first_tie, second_tie, late]);
    }

    #[tokio::test]
    async fn test_scan_since_is_inclusive() {
        let (store, _db) = store().await;
        store.insert(RecordEvent::new("page_view"), 99).await.unwrap();
        store.insert(RecordEvent::new("page_view"), 100).await.unwrap();
        store.insert(RecordEvent::new("page_view"), 101).await.unwrap();

        let events = store.scan_since(Some(100)).await.unwrap();
        let stamps: Vec<i64> = events.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![100, 101]);
    }

    #[tokio::test]
    async fn test_scan_by_category_and_session() {
        let (store, _db) = store().await;
        store
            .insert(RecordEvent::new("page_view").session("a"), 10)
            .await
            .unwrap();
        store
            .insert(RecordEvent::new("contact_form_submit").session("a"), 20)
            .await
            .unwrap();
        store
            .insert(RecordEvent::new("page_view").session("b"), 30)
            .await
            .unwrap();

        assert_eq!(store.scan_category("page_view").await.unwrap().len(), 2);
        assert_eq!(store.scan_category("unheard_of").await.unwrap().len(), 0);
        assert_eq!(store.scan_session("a").await.unwrap().len(), 2);
        assert_eq!(store.scan_session("c").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_scan_ids_before_and_delete() {
        let (store, _db) = store().await;
        let old = store.insert(RecordEvent::new("page_view"), 10).await.unwrap();
        store.insert(RecordEvent::new("page_view"), 20).await.unwrap();

        assert_eq!(store.scan_ids_before(20).await.unwrap(), vec![old]);
        assert!(store.delete(old).await.unwrap());
        assert!(!store.delete(old).await.unwrap());
        assert!(store.scan_ids_before(20).await.unwrap().is_empty());
    }
}
