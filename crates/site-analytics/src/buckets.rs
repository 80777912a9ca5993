//! Dense, gap-free time series anchored at "now"
//!
//! For `count` buckets of width `period`, bucket `i` (counting back from the
//! newest) covers `[now - i * period, now - i * period + period)`. Buckets are
//! half-open so an event sitting exactly on an edge lands in exactly one of
//! them. Rows come out oldest first and empty buckets are kept.

use site_core::{EpochMillis, MILLIS_PER_DAY, MILLIS_PER_HOUR};

use crate::types::{AnalyticsEvent, CategoryCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// 24 one-hour buckets
    Hourly,
    /// 30 one-day buckets
    Daily,
}

impl Granularity {
    pub fn period(self) -> EpochMillis {
        match self {
            Granularity::Hourly => MILLIS_PER_HOUR,
            Granularity::Daily => MILLIS_PER_DAY,
        }
    }

    pub fn bucket_count(self) -> usize {
        match self {
            Granularity::Hourly => 24,
            Granularity::Daily => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBucket {
    pub start: EpochMillis,
    pub end: EpochMillis,
    pub counts: CategoryCounts,
}

impl TimeBucket {
    pub fn contains(&self, timestamp: EpochMillis) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

/// Empty buckets for the series ending at `now`, oldest first.
pub fn bucket_edges(now: EpochMillis, period: EpochMillis, count: usize) -> Vec<TimeBucket> {
    (0..count)
        .rev()
        .map(|i| {
            let start = now - i as EpochMillis * period;
            TimeBucket {
                start,
                end: start + period,
                counts: CategoryCounts::default(),
            }
        })
        .collect()
}

/// Count `events` into `count` buckets of width `period` anchored at `now`.
///
/// Events outside the series are ignored.
pub fn bucketize<'a>(
    events: impl IntoIterator<Item = &'a AnalyticsEvent>,
    now: EpochMillis,
    period: EpochMillis,
    count: usize,
) -> Vec<TimeBucket> {
    let mut buckets = bucket_edges(now, period, count);
    let Some(first_start) = buckets.first().map(|b| b.start) else {
        return buckets;
    };

    for event in events {
        if event.timestamp < first_start {
            continue;
        }
        let index = ((event.timestamp - first_start) / period) as usize;
        if let Some(bucket) = buckets.get_mut(index) {
            debug_assert!(bucket.contains(event.timestamp));
            bucket.counts.record(&event.category);
        }
    }

    buckets
}

pub fn bucketize_with<'a>(
    events: impl IntoIterator<Item = &'a AnalyticsEvent>,
    now: EpochMillis,
    granularity: Granularity,
) -> Vec<TimeBucket> {
    bucketize(events, now, granularity.period(), granularity.bucket_count())
}
