//! Frequency tables and top-N extraction
//!
//! Entries are ordered by count, highest first. Equal counts are ordered by
//! key, lexicographically ascending, so the output is the same no matter what
//! order the events arrived in.

use std::collections::BTreeMap;

use crate::types::AnalyticsEvent;

pub const DEFAULT_TOP_N: usize = 10;

/// Key used for events without a path.
pub const UNKNOWN_PATH: &str = "unknown";
/// Key used for events without a referrer.
pub const DIRECT_REFERRER: &str = "direct";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

pub fn path_key(event: &AnalyticsEvent) -> &str {
    event.path.as_deref().unwrap_or(UNKNOWN_PATH)
}

pub fn referrer_key(event: &AnalyticsEvent) -> &str {
    event.referrer.as_deref().unwrap_or(DIRECT_REFERRER)
}

pub fn frequency_table<'a, F>(
    events: impl IntoIterator<Item = &'a AnalyticsEvent>,
    key: F,
) -> BTreeMap<String, u64>
where
    F: Fn(&'a AnalyticsEvent) -> &'a str,
{
    let mut table = BTreeMap::new();
    for event in events {
        *table.entry(key(event).to_string()).or_insert(0) += 1;
    }
    table
}

/// The `n` most frequent keys of `table`.
pub fn top_n(table: BTreeMap<String, u64>, n: usize) -> Vec<RankedEntry> {
    // BTreeMap iterates in key order and the sort is stable, which gives the
    // key-ascending tie-break.
    let mut entries: Vec<RankedEntry> = table
        .into_iter()
        .map(|(key, count)| RankedEntry { key, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}

pub fn rank_by<'a, F>(
    events: impl IntoIterator<Item = &'a AnalyticsEvent>,
    key: F,
    n: usize,
) -> Vec<RankedEntry>
where
    F: Fn(&'a AnalyticsEvent) -> &'a str,
{
    top_n(frequency_table(events, key), n)
}
