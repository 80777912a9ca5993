//! Age-based deletion of old events
//!
//! The sweep is a scan followed by one delete per event, not a transaction.
//! An interrupted sweep leaves the already-deleted events deleted and the
//! next run picks up whatever is still older than its cutoff.

use site_core::{EpochMillis, MILLIS_PER_DAY};
use tracing::debug;

use crate::store::EventStore;
use crate::types::AnalyticsError;

/// `now - older_than_days` days, rejecting negative ages.
pub fn cutoff(now: EpochMillis, older_than_days: i64) -> Result<EpochMillis, AnalyticsError> {
    if older_than_days < 0 {
        return Err(AnalyticsError::Validation(format!(
            "older_than_days must not be negative, got {}",
            older_than_days
        )));
    }

    older_than_days
        .checked_mul(MILLIS_PER_DAY)
        .and_then(|age| now.checked_sub(age))
        .ok_or_else(|| {
            AnalyticsError::Validation(format!(
                "older_than_days is too large: {}",
                older_than_days
            ))
        })
}

/// Delete every event with `timestamp < cutoff`, returning how many this
/// sweep removed.
pub async fn sweep(store: &dyn EventStore, cutoff: EpochMillis) -> Result<u64, AnalyticsError> {
    let ids = store.scan_ids_before(cutoff).await?;
    debug!("Retention sweep found {} events before {}", ids.len(), cutoff);

    let mut deleted = 0;
    for id in ids {
        // A concurrent sweep may have removed it already.
        if store.delete(id).await? {
            deleted += 1;
        }
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SeaOrmEventStore;
    use crate::testing::test_helpers::TEST_NOW;
    use crate::types::RecordEvent;
    use site_database::test_utils::TestDatabase;

    #[test]
    fn test_cutoff_arithmetic() {
        assert_eq!(cutoff(TEST_NOW, 0).unwrap(), TEST_NOW);
        assert_eq!(cutoff(TEST_NOW, 1).unwrap(), TEST_NOW - 86_400_000);
        assert_eq!(cutoff(TEST_NOW, 30).unwrap(), TEST_NOW - 30 * 86_400_000);
    }

    #[test]
    fn test_cutoff_rejects_bad_ages() {
        assert!(matches!(
            cutoff(TEST_NOW, -1),
            Err(AnalyticsError::Validation(_))
        ));
        assert!(matches!(
            cutoff(TEST_NOW, i64::MAX),
            Err(AnalyticsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_sweep_deletes_strictly_older_events() {
        let test_db = TestDatabase::with_migrations().await.unwrap();
        let store = SeaOrmEventStore::new(test_db.db.clone());
        let cut = TEST_NOW - MILLIS_PER_DAY;

        store.insert(RecordEvent::new("page_view"), cut - 1).await.unwrap();
        store.insert(RecordEvent::new("page_view"), cut).await.unwrap();
        store.insert(RecordEvent::new("page_view"), TEST_NOW).await.unwrap();

        assert_eq!(sweep(&store, cut).await.unwrap(), 1);
        assert_eq!(test_db.count_rows("analytics_events").await.unwrap(), 2);
        // Nothing left to do on a second pass.
        assert_eq!(sweep(&store, cut).await.unwrap(), 0);
    }
}
