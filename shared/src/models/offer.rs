//! Offer Model

use crate::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing tier label
///
/// Every offer carries exactly one detail per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferTier {
    Basic,
    Standard,
    Premium,
}

impl OfferTier {
    /// All tiers, in display order
    pub const ALL: [OfferTier; 3] = [OfferTier::Basic, OfferTier::Standard, OfferTier::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }
}

impl std::fmt::Display for OfferTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Offer detail entity (one pricing tier of an offer)
///
/// Owned by its parent offer; never exists independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDetail {
    pub id: i64,
    pub offer_id: i64,
    pub title: String,
    /// -1 means unlimited revisions
    pub revisions: i32,
    pub delivery_time_in_days: i32,
    pub price: Decimal,
    pub features: Vec<String>,
    pub offer_type: OfferTier,
}

/// Offer entity
///
/// `min_price` and `min_delivery_time` are derived from the embedded
/// details and recomputed on every detail change, never read stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    /// Creator (business user)
    pub user_id: i64,
    pub title: String,
    /// Offer image reference (URL or storage key)
    pub image: Option<String>,
    pub description: String,
    pub details: Vec<OfferDetail>,
    pub min_price: Decimal,
    pub min_delivery_time: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Offer {
    /// Recompute `min_price` and `min_delivery_time` from the details
    pub fn recompute_derived(&mut self) {
        self.min_price = self
            .details
            .iter()
            .map(|d| d.price)
            .min()
            .unwrap_or(Decimal::ZERO);
        self.min_delivery_time = self
            .details
            .iter()
            .map(|d| d.delivery_time_in_days)
            .min()
            .unwrap_or(0);
    }

    /// Detail for the given tier, if present
    pub fn detail_for(&self, tier: OfferTier) -> Option<&OfferDetail> {
        self.details.iter().find(|d| d.offer_type == tier)
    }
}

/// Create offer detail payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDetailCreate {
    pub title: String,
    pub revisions: i32,
    pub delivery_time_in_days: i32,
    pub price: Decimal,
    pub features: Vec<String>,
    pub offer_type: OfferTier,
}

/// Create offer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferCreate {
    pub title: String,
    pub image: Option<String>,
    pub description: String,
    /// Exactly one entry per tier
    pub details: Vec<OfferDetailCreate>,
}

/// Patch for one pricing tier, keyed by tier label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDetailPatch {
    pub offer_type: OfferTier,
    pub title: Option<String>,
    pub revisions: Option<i32>,
    pub delivery_time_in_days: Option<i32>,
    pub price: Option<Decimal>,
    pub features: Option<Vec<String>>,
}

/// Update offer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferUpdate {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub details: Option<Vec<OfferDetailPatch>>,
}

/// Sort key for offer listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferOrdering {
    UpdatedAt,
    MinPrice,
}

/// Offer listing filters (all supplied filters are ANDed)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferQuery {
    pub creator_id: Option<i64>,
    /// Match offers with at least one detail priced at or above this
    pub min_price: Option<Decimal>,
    /// Match offers with at least one detail delivered within this many days
    pub max_delivery_time: Option<i32>,
    /// Case-insensitive match over title and description
    pub search: Option<String>,
    /// Defaults to newest-updated first
    pub ordering: Option<OfferOrdering>,
    pub descending: Option<bool>,
}
