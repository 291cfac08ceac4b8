//! Platform statistics

use serde::{Deserialize, Serialize};

/// Platform-wide aggregate statistics
///
/// Ephemeral: recomputed from the stores on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub review_count: usize,
    /// Mean rating rounded to 1 decimal; 0.0 when there are no reviews
    pub average_rating: f64,
    pub business_profile_count: usize,
    pub offer_count: usize,
}

/// Per-business order count (in-progress or completed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCount {
    pub order_count: usize,
}
