//! Fixed five-step contact conversion funnel
//!
//! Steps: landing page views, service views, portfolio views, views of the
//! contact page, contact form submissions. Rates are rooted at page views
//! except the submission rate, which is relative to contact page views.

use crate::types::responses::ConversionFunnel;
use crate::types::{AnalyticsEvent, EventCategory};

pub const CONTACT_PAGE_PATH: &str = "/contact";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunnelCounts {
    pub page_views: u64,
    pub service_views: u64,
    pub portfolio_views: u64,
    pub contact_page_views: u64,
    pub contact_submissions: u64,
}

impl FunnelCounts {
    pub fn count<'a>(events: impl IntoIterator<Item = &'a AnalyticsEvent>) -> Self {
        let mut counts = Self::default();
        for event in events {
            match event.category {
                EventCategory::PageView => {
                    counts.page_views += 1;
                    if event.path.as_deref() == Some(CONTACT_PAGE_PATH) {
                        counts.contact_page_views += 1;
                    }
                }
                EventCategory::ServiceView => counts.service_views += 1,
                EventCategory::PortfolioView => counts.portfolio_views += 1,
                EventCategory::ContactFormSubmit => counts.contact_submissions += 1,
                EventCategory::ServiceInquiry | EventCategory::Other(_) => {}
            }
        }
        counts
    }

    pub fn into_funnel(self) -> ConversionFunnel {
        ConversionFunnel {
            service_view_rate: percentage(self.service_views, self.page_views),
            portfolio_view_rate: percentage(self.portfolio_views, self.page_views),
            contact_page_rate: percentage(self.contact_page_views, self.page_views),
            contact_submission_rate: percentage(
                self.contact_submissions,
                self.contact_page_views,
            ),
            overall_conversion_rate: percentage(self.contact_submissions, self.page_views),
            page_views: self.page_views,
            service_views: self.service_views,
            portfolio_views: self.portfolio_views,
            contact_page_views: self.contact_page_views,
            contact_submissions: self.contact_submissions,
        }
    }
}

/// `numerator / denominator * 100` with two fractional digits, `"0"` when the
/// denominator is zero.
///
/// Computed in hundredths of a percent with integers; halves round up.
pub fn percentage(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "0".to_string();
    }
    let denominator = u128::from(denominator);
    let hundredths = (u128::from(numerator) * 20_000 + denominator) / (2 * denominator);
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

pub fn conversion_funnel<'a>(
    events: impl IntoIterator<Item = &'a AnalyticsEvent>,
) -> ConversionFunnel {
    FunnelCounts::count(events).into_funnel()
}
