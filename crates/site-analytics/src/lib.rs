//! Site analytics: event ingestion and the aggregate views built on it

pub mod analytics;
pub mod buckets;
pub mod funnel;
pub mod handler;
pub mod ranking;
pub mod retention;
pub mod snapshot;
pub mod store;
pub mod traits;
pub mod types;
pub mod window;

#[cfg(test)]
pub mod testing;

// Re-export main types and service
pub use analytics::AnalyticsService;
pub use handler::{configure_routes, AnalyticsApiDoc, AppState};
pub use snapshot::Snapshot;
pub use store::{EventStore, SeaOrmEventStore};
pub use traits::Analytics;
pub use types::*;
pub use window::TimeWindow;
