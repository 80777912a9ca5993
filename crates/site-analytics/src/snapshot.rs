//! One fetch, many metrics
//!
//! A `Snapshot` holds the events a query pulled from the store, already
//! narrowed to the query's window, together with the `now` sampled for that
//! query. Every summary a query returns is derived from the same snapshot so
//! its numbers agree with each other even while writes continue.

use std::collections::{BTreeMap, HashSet};

use site_core::{date_label, hour_of_day, EpochMillis};

use crate::buckets::{bucketize_with, Granularity};
use crate::funnel::conversion_funnel;
use crate::ranking::{path_key, rank_by, referrer_key, DEFAULT_TOP_N};
use crate::types::responses::{
    ConversionFunnel, DailyStat, DashboardSummary, HourlyStat, PageCount, RealtimeSummary,
    ReferrerCount,
};
use crate::types::{AnalyticsEvent, CategoryCounts, EventCategory};
use crate::window::TimeWindow;

pub const RECENT_EVENTS_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct Snapshot {
    now: EpochMillis,
    events: Vec<AnalyticsEvent>,
}

impl Snapshot {
    /// Build a snapshot from already-collected events, keeping only those
    /// inside `window`.
    pub fn collect(now: EpochMillis, events: Vec<AnalyticsEvent>, window: &TimeWindow) -> Self {
        Self {
            now,
            events: window.filter(events),
        }
    }

    pub fn now(&self) -> EpochMillis {
        self.now
    }

    pub fn events(&self) -> &[AnalyticsEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn page_views(&self) -> impl Iterator<Item = &AnalyticsEvent> {
        self.events
            .iter()
            .filter(|event| event.category == EventCategory::PageView)
    }

    pub fn unique_sessions(&self) -> u64 {
        self.events
            .iter()
            .filter_map(|event| event.session_id.as_deref())
            .collect::<HashSet<_>>()
            .len() as u64
    }

    pub fn events_by_category(&self) -> BTreeMap<String, u64> {
        let mut table = BTreeMap::new();
        for event in &self.events {
            *table.entry(event.category.to_string()).or_insert(0) += 1;
        }
        table
    }

    pub fn top_pages(&self) -> Vec<PageCount> {
        rank_by(self.page_views(), path_key, DEFAULT_TOP_N)
            .into_iter()
            .map(|entry| PageCount {
                path: entry.key,
                count: entry.count,
            })
            .collect()
    }

    pub fn top_referrers(&self) -> Vec<ReferrerCount> {
        rank_by(self.page_views(), referrer_key, DEFAULT_TOP_N)
            .into_iter()
            .map(|entry| ReferrerCount {
                referrer: entry.key,
                count: entry.count,
            })
            .collect()
    }

    pub fn daily_stats(&self) -> Vec<DailyStat> {
        bucketize_with(&self.events, self.now, Granularity::Daily)
            .into_iter()
            .map(|bucket| DailyStat {
                date: date_label(bucket.start),
                bucket_start: bucket.start,
                page_views: bucket.counts.page_views,
                contacts: bucket.counts.contacts,
                inquiries: bucket.counts.inquiries,
                total: bucket.counts.total,
            })
            .collect()
    }

    pub fn hourly_stats(&self) -> Vec<HourlyStat> {
        bucketize_with(&self.events, self.now, Granularity::Hourly)
            .into_iter()
            .map(|bucket| HourlyStat {
                hour: hour_of_day(bucket.start),
                bucket_start: bucket.start,
                page_views: bucket.counts.page_views,
                contacts: bucket.counts.contacts,
                total: bucket.counts.total,
            })
            .collect()
    }

    /// Newest `limit` events, newest first.
    pub fn most_recent(&self, limit: usize) -> Vec<AnalyticsEvent> {
        // Events are stored oldest first.
        self.events.iter().rev().take(limit).cloned().collect()
    }

    pub fn dashboard(&self) -> DashboardSummary {
        let totals = CategoryCounts::tally(&self.events);

        DashboardSummary {
            total_events: totals.total,
            total_page_views: totals.page_views,
            total_contacts: totals.contacts,
            total_service_inquiries: totals.inquiries,
            events_by_category: self.events_by_category(),
            top_pages: self.top_pages(),
            top_referrers: self.top_referrers(),
            daily_stats: self.daily_stats(),
            unique_sessions: self.unique_sessions(),
        }
    }

    pub fn realtime(&self) -> RealtimeSummary {
        RealtimeSummary {
            total_events: self.events.len() as u64,
            hourly_stats: self.hourly_stats(),
            recent_events: self.most_recent(RECENT_EVENTS_LIMIT),
        }
    }

    pub fn funnel(&self) -> ConversionFunnel {
        conversion_funnel(&self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_helpers::{
        event_at, from_referrer, in_session, page_view, TEST_NOW,
    };
    use site_core::{MILLIS_PER_DAY, MILLIS_PER_HOUR};

    fn contact_scenario() -> Vec<AnalyticsEvent> {
        vec![
            page_view(1, "/", TEST_NOW - 50 * 60_000),
            page_view(2, "/", TEST_NOW - 40 * 60_000),
            page_view(3, "/contact", TEST_NOW - 30 * 60_000),
            event_at(4, "contact_form_submit", TEST_NOW - 20 * 60_000),
        ]
    }

    #[test]
    fn test_dashboard_contact_scenario() {
        let snapshot = Snapshot::collect(TEST_NOW, contact_scenario(), &TimeWindow::unbounded());
        let dashboard = snapshot.dashboard();

        assert_eq!(dashboard.total_events, 4);
        assert_eq!(dashboard.total_page_views, 3);
        assert_eq!(dashboard.total_contacts, 1);
        assert_eq!(dashboard.total_service_inquiries, 0);
        assert_eq!(
            dashboard.top_pages,
            vec![
                PageCount { path: "/".to_string(), count: 2 },
                PageCount { path: "/contact".to_string(), count: 1 },
            ]
        );
        assert_eq!(
            dashboard.top_referrers,
            vec![ReferrerCount { referrer: "direct".to_string(), count: 3 }]
        );
        assert_eq!(dashboard.daily_stats.len(), 30);
        assert_eq!(dashboard.unique_sessions, 0);
    }

    #[test]
    fn test_dashboard_total_matches_window_filter() {
        let events: Vec<_> = (0..50)
            .map(|i| page_view(i, "/", TEST_NOW - i as i64 * MILLIS_PER_HOUR))
            .collect();
        let window = TimeWindow::new(
            Some(TEST_NOW - 10 * MILLIS_PER_HOUR),
            Some(TEST_NOW - 2 * MILLIS_PER_HOUR),
        );

        let expected = window.filter(events.clone()).len() as u64;
        let dashboard = Snapshot::collect(TEST_NOW, events, &window).dashboard();
        assert_eq!(dashboard.total_events, expected);
        assert_eq!(dashboard.total_events, 9);
    }

    #[test]
    fn test_unknown_categories_keep_their_totals() {
        let events = vec![
            event_at(1, "newsletter_signup", TEST_NOW - 10),
            event_at(2, "newsletter_signup", TEST_NOW - 5),
            page_view(3, "/", TEST_NOW - 1),
        ];
        let dashboard = Snapshot::collect(TEST_NOW, events, &TimeWindow::unbounded()).dashboard();

        assert_eq!(dashboard.total_events, 3);
        assert_eq!(dashboard.events_by_category.get("newsletter_signup"), Some(&2));
        assert_eq!(dashboard.events_by_category.get("page_view"), Some(&1));
    }

    #[test]
    fn test_top_tables_stay_within_page_view_total() {
        let mut events = Vec::new();
        for i in 0..40 {
            let view = page_view(i, &format!("/p{}", i % 13), TEST_NOW - i as i64);
            events.push(from_referrer(view, &format!("https://ref{}.example", i % 7)));
        }
        events.push(event_at(100, "service_view", TEST_NOW));

        let dashboard = Snapshot::collect(TEST_NOW, events, &TimeWindow::unbounded()).dashboard();
        for table in [
            dashboard.top_pages.iter().map(|p| p.count).collect::<Vec<_>>(),
            dashboard.top_referrers.iter().map(|r| r.count).collect::<Vec<_>>(),
        ] {
            assert!(table.len() <= 10);
            assert!(table.windows(2).all(|w| w[0] >= w[1]));
            assert!(table.iter().sum::<u64>() <= dashboard.total_page_views);
        }
    }

    #[test]
    fn test_unique_sessions_ignores_missing_ids() {
        let events = vec![
            in_session(page_view(1, "/", 10), "a"),
            in_session(page_view(2, "/", 20), "a"),
            in_session(page_view(3, "/", 30), "b"),
            page_view(4, "/", 40),
        ];
        let snapshot = Snapshot::collect(TEST_NOW, events, &TimeWindow::unbounded());
        assert_eq!(snapshot.unique_sessions(), 2);
    }

    #[test]
    fn test_daily_stats_labels_and_placement() {
        let events = vec![
            page_view(1, "/", TEST_NOW - MILLIS_PER_DAY),
            event_at(2, "service_inquiry", TEST_NOW - 29 * MILLIS_PER_DAY),
        ];
        let stats = Snapshot::collect(TEST_NOW, events, &TimeWindow::unbounded()).daily_stats();

        assert_eq!(stats.len(), 30);
        assert_eq!(stats[29].date, "2024-03-10");
        assert_eq!(stats[0].date, "2024-02-10");
        assert_eq!(stats[28].page_views, 1);
        assert_eq!(stats[0].inquiries, 1);
        assert!(stats.windows(2).all(|w| w[0].bucket_start < w[1].bucket_start));
    }

    #[test]
    fn test_realtime_summary() {
        let mut events: Vec<_> = (0..30)
            .map(|i| page_view(i, "/", TEST_NOW - (30 - i as i64) * 60_000))
            .collect();
        events.push(event_at(99, "contact_form_submit", TEST_NOW - 2 * MILLIS_PER_HOUR));
        events.sort_by_key(|e| e.timestamp);

        let window = TimeWindow::since(TEST_NOW - MILLIS_PER_DAY);
        let realtime = Snapshot::collect(TEST_NOW, events, &window).realtime();

        assert_eq!(realtime.total_events, 31);
        assert_eq!(realtime.hourly_stats.len(), 24);
        assert_eq!(realtime.hourly_stats[23].hour, 15);
        assert_eq!(realtime.recent_events.len(), RECENT_EVENTS_LIMIT);
        assert!(realtime
            .recent_events
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(realtime.recent_events[0].id, 29);
    }

    #[test]
    fn test_funnel_uses_same_window() {
        let mut events = contact_scenario();
        events.insert(0, page_view(0, "/contact", TEST_NOW - 3 * MILLIS_PER_DAY));
        let window = TimeWindow::since(TEST_NOW - MILLIS_PER_DAY);

        let snapshot = Snapshot::collect(TEST_NOW, events, &window);
        let funnel = snapshot.funnel();
        assert_eq!(funnel.page_views, snapshot.dashboard().total_page_views);
        assert_eq!(funnel.contact_page_views, 1);
    }
}
