//! Review Model

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Review entity
///
/// At most one review per (reviewer, business_user) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    /// Business user being reviewed
    pub business_user_id: i64,
    /// Customer writing the review
    pub reviewer_id: i64,
    /// 1..=5
    pub rating: i32,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub business_user_id: i64,
    pub rating: i32,
    pub description: String,
}

/// Update review payload (reviewer only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewUpdate {
    pub rating: Option<i32>,
    pub description: Option<String>,
}

/// Sort key for review listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOrdering {
    UpdatedAt,
    Rating,
}

/// Review listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewQuery {
    pub business_user_id: Option<i64>,
    pub reviewer_id: Option<i64>,
    /// Defaults to newest-updated first
    pub ordering: Option<ReviewOrdering>,
    pub descending: Option<bool>,
}
