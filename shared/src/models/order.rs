//! Order Model

use super::offer::OfferTier;
use crate::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status
///
/// `Completed` and `Cancelled` are terminal: no outgoing transitions,
/// including to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order entity
///
/// Snapshot of one offer detail at placement time: title, revisions,
/// delivery time, price, features and tier are copied, so later catalog
/// edits never change an existing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_user_id: i64,
    pub business_user_id: i64,
    /// Source offer (informational; the snapshot below is authoritative)
    pub offer_id: i64,
    pub offer_detail_id: i64,
    pub title: String,
    pub revisions: i32,
    pub delivery_time_in_days: i32,
    pub price: Decimal,
    pub features: Vec<String>,
    pub offer_type: OfferTier,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
