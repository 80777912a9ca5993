//! Time types shared by the store and the aggregation code
//!
//! Timestamps cross every boundary as integer epoch milliseconds. `chrono` is
//! only used to turn a bucket edge into a human label.

use chrono::{DateTime, TimeZone, Timelike, Utc};

/// Standard UTC DateTime type used across all site crates
pub type UtcDateTime = DateTime<Utc>;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

pub const MILLIS_PER_HOUR: EpochMillis = 3_600_000;
pub const MILLIS_PER_DAY: EpochMillis = 86_400_000;

/// Convert epoch milliseconds into a UTC datetime.
///
/// Returns `None` for values chrono cannot represent.
pub fn millis_to_utc(millis: EpochMillis) -> Option<UtcDateTime> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Calendar date (`YYYY-MM-DD`, UTC) containing the given instant.
pub fn date_label(millis: EpochMillis) -> String {
    millis_to_utc(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Hour of day (0-23, UTC) containing the given instant.
pub fn hour_of_day(millis: EpochMillis) -> u32 {
    millis_to_utc(millis).map(|dt| dt.hour()).unwrap_or(0)
}
