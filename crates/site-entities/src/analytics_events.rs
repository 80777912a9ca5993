//! `SeaORM` Entity for analytics_events table
//!
//! Rows are append-only: written once by the event recorder and removed only
//! by the retention sweep.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "analytics_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Event kind, e.g. "page_view" or "contact_form_submit". Indexed.
    pub category: String,

    pub path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,

    /// Browsing session the event belongs to. Indexed.
    pub session_id: Option<String>,

    /// JSON-encoded key/value bag
    pub metadata: Option<String>,

    /// Epoch milliseconds, assigned at ingestion. Indexed.
    pub timestamp: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
