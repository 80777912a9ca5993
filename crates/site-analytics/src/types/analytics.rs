use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use site_core::EpochMillis;
use site_entities::analytics_events;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Other error: {0}")]
    Other(String),
}

/// Kind of a recorded event.
///
/// Categories are free-form strings on the wire. The ones the aggregations
/// look for get their own variant; everything else is kept verbatim in
/// `Other` so it still shows up in per-category totals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCategory {
    PageView,
    ContactFormSubmit,
    ServiceView,
    PortfolioView,
    ServiceInquiry,
    Other(String),
}

impl EventCategory {
    pub fn parse(value: &str) -> Self {
        match value {
            "page_view" => EventCategory::PageView,
            "contact_form_submit" => EventCategory::ContactFormSubmit,
            "service_view" => EventCategory::ServiceView,
            "portfolio_view" => EventCategory::PortfolioView,
            "service_inquiry" => EventCategory::ServiceInquiry,
            other => EventCategory::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventCategory::PageView => "page_view",
            EventCategory::ContactFormSubmit => "contact_form_submit",
            EventCategory::ServiceView => "service_view",
            EventCategory::PortfolioView => "portfolio_view",
            EventCategory::ServiceInquiry => "service_inquiry",
            EventCategory::Other(other) => other,
        }
    }
}

impl From<String> for EventCategory {
    fn from(value: String) -> Self {
        match EventCategory::parse(&value) {
            EventCategory::Other(_) => EventCategory::Other(value),
            known => known,
        }
    }
}

impl From<&str> for EventCategory {
    fn from(value: &str) -> Self {
        EventCategory::parse(value)
    }
}

impl From<EventCategory> for String {
    fn from(value: EventCategory) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsEvent {
    pub id: i32,
    #[schema(value_type = String, example = "page_view")]
    pub category: EventCategory,
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub session_id: Option<String>,
    pub metadata: Option<Value>,
    /// Epoch milliseconds assigned at ingestion
    pub timestamp: EpochMillis,
}

impl From<analytics_events::Model> for AnalyticsEvent {
    fn from(model: analytics_events::Model) -> Self {
        let metadata = model.metadata.as_deref().and_then(|raw| {
            serde_json::from_str(raw)
                .map_err(|e| {
                    tracing::warn!("Dropping unreadable metadata on event {}: {}", model.id, e);
                })
                .ok()
        });

        Self {
            id: model.id,
            category: EventCategory::from(model.category),
            path: model.path,
            referrer: model.referrer,
            user_agent: model.user_agent,
            ip_address: model.ip_address,
            session_id: model.session_id,
            metadata,
            timestamp: model.timestamp,
        }
    }
}

/// Input of the event recorder. Only `category` is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordEvent {
    pub category: String,
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub session_id: Option<String>,
    pub metadata: Option<Value>,
}

impl RecordEvent {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Per-category tallies over a set of events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub total: u64,
    pub page_views: u64,
    pub contacts: u64,
    pub inquiries: u64,
    pub service_views: u64,
    pub portfolio_views: u64,
}

impl CategoryCounts {
    pub fn record(&mut self, category: &EventCategory) {
        self.total += 1;
        match category {
            EventCategory::PageView => self.page_views += 1,
            EventCategory::ContactFormSubmit => self.contacts += 1,
            EventCategory::ServiceInquiry => self.inquiries += 1,
            EventCategory::ServiceView => self.service_views += 1,
            EventCategory::PortfolioView => self.portfolio_views += 1,
            EventCategory::Other(_) => {}
        }
    }

    pub fn tally<'a>(events: impl IntoIterator<Item = &'a AnalyticsEvent>) -> Self {
        let mut counts = Self::default();
        for event in events {
            counts.record(&event.category);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories_round_trip() {
        for raw in [
            "page_view",
            "contact_form_submit",
            "service_view",
            "portfolio_view",
            "service_inquiry",
        ] {
            let category = EventCategory::from(raw);
            assert!(!matches!(category, EventCategory::Other(_)), "{raw}");
            assert_eq!(category.as_str(), raw);
        }
    }

    #[test]
    fn test_unknown_category_is_preserved() {
        let category = EventCategory::from("newsletter_signup".to_string());
        assert_eq!(
            category,
            EventCategory::Other("newsletter_signup".to_string())
        );
        assert_eq!(category.to_string(), "newsletter_signup");
    }

    #[test]
    fn test_category_serializes_as_plain_string() {
        let json = serde_json::to_value(EventCategory::PageView).unwrap();
        assert_eq!(json, serde_json::json!("page_view"));

        let parsed: EventCategory = serde_json::from_value(serde_json::json!("video_play")).unwrap();
        assert_eq!(parsed, EventCategory::Other("video_play".to_string()));
    }

    #[test]
    fn test_model_conversion_parses_metadata() {
        let model = analytics_events::Model {
            id: 7,
            category: "service_view".to_string(),
            path: Some("/services/web".to_string()),
            referrer: None,
            user_agent: None,
            ip_address: None,
            session_id: Some("s1".to_string()),
            metadata: Some(r#"{"service":"web"}"#.to_string()),
            timestamp: 1_000,
        };

        let event = AnalyticsEvent::from(model);
        assert_eq!(event.category, EventCategory::ServiceView);
        assert_eq!(event.metadata, Some(serde_json::json!({"service": "web"})));
    }

    #[test]
    fn test_model_conversion_drops_broken_metadata() {
        let model = analytics_events::Model {
            id: 8,
            category: "page_view".to_string(),
            path: None,
            referrer: None,
            user_agent: None,
            ip_address: None,
            session_id: None,
            metadata: Some("{not json".to_string()),
            timestamp: 1_000,
        };

        assert_eq!(AnalyticsEvent::from(model).metadata, None);
    }

    #[test]
    fn test_category_counts() {
        let mut counts = CategoryCounts::default();
        counts.record(&EventCategory::PageView);
        counts.record(&EventCategory::PageView);
        counts.record(&EventCategory::ContactFormSubmit);
        counts.record(&EventCategory::Other("x".to_string()));

        assert_eq!(counts.total, 4);
        assert_eq!(counts.page_views, 2);
        assert_eq!(counts.contacts, 1);
        assert_eq!(counts.inquiries, 0);
    }
}
