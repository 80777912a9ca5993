//! `SeaORM` entities for the site database

pub mod analytics_events;

pub mod prelude {
    pub use super::analytics_events::Entity as AnalyticsEvents;
}
