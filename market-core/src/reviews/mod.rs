//! Review ledger
//!
//! Customer ratings of business users, at most one review per
//! (reviewer, business) pair. The pair index is maintained under the same
//! write lock as the review map, so two racing submissions for the same
//! pair produce exactly one review and one conflict.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;
use tracing::info;

use shared::models::{Principal, Review, ReviewCreate, ReviewOrdering, ReviewQuery, ReviewUpdate};
use shared::now_ms;

use crate::policy::{Action, can_perform};
use crate::utils::validation::{MAX_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Default)]
struct ReviewsInner {
    reviews: HashMap<i64, Review>,
    /// (reviewer, business) -> review id, uniqueness index
    by_pair: HashMap<(i64, i64), i64>,
}

/// Review store
pub struct ReviewLedger {
    inner: RwLock<ReviewsInner>,
    next_id: AtomicI64,
}

impl Default for ReviewLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_rating(rating: i32) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::new(ErrorCode::RatingOutOfRange).with_detail("rating", rating));
    }
    Ok(())
}

impl ReviewLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ReviewsInner::default()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Submit a review. One per (reviewer, business) pair.
    pub fn create_review(&self, principal: &Principal, payload: ReviewCreate) -> AppResult<Review> {
        if !can_perform(principal, Action::CreateReview, None) {
            return Err(AppError::with_message(
                ErrorCode::RoleRequired,
                "only customers can write reviews",
            )
            .with_detail("required_role", "customer"));
        }
        validate_rating(payload.rating)?;
        if payload.description.len() > MAX_TEXT_LEN {
            return Err(AppError::validation(format!(
                "description is too long ({} chars, max {MAX_TEXT_LEN})",
                payload.description.len()
            )));
        }

        let mut inner = self.inner.write();
        let pair = (principal.user_id, payload.business_user_id);
        if inner.by_pair.contains_key(&pair) {
            return Err(AppError::new(ErrorCode::DuplicateReview)
                .with_detail("business_user_id", payload.business_user_id));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = now_ms();
        let review = Review {
            id,
            business_user_id: payload.business_user_id,
            reviewer_id: principal.user_id,
            rating: payload.rating,
            description: payload.description,
            created_at: now,
            updated_at: now,
        };

        inner.by_pair.insert(pair, id);
        inner.reviews.insert(id, review.clone());

        info!(
            review_id = id,
            reviewer = principal.user_id,
            business = review.business_user_id,
            rating = review.rating,
            "review created"
        );
        Ok(review)
    }

    pub fn get_review(&self, review_id: i64) -> AppResult<Review> {
        self.inner
            .read()
            .reviews
            .get(&review_id)
            .cloned()
            .ok_or_else(|| {
                AppError::new(ErrorCode::ReviewNotFound).with_detail("review_id", review_id)
            })
    }

    /// Patch a review. Only its author may do this.
    pub fn update_review(
        &self,
        principal: &Principal,
        review_id: i64,
        patch: ReviewUpdate,
    ) -> AppResult<Review> {
        let mut inner = self.inner.write();
        let review = inner.reviews.get_mut(&review_id).ok_or_else(|| {
            AppError::new(ErrorCode::ReviewNotFound).with_detail("review_id", review_id)
        })?;
        if !can_perform(principal, Action::UpdateReview, Some(review.reviewer_id)) {
            return Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "only the review author can update it",
            ));
        }

        // Validate only after the permission gate
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        validate_optional_text(&patch.description, "description", MAX_TEXT_LEN)?;

        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(description) = patch.description {
            review.description = description;
        }
        review.updated_at = now_ms();

        info!(review_id, "review updated");
        Ok(review.clone())
    }

    /// Remove a review. Only its author may do this.
    pub fn delete_review(&self, principal: &Principal, review_id: i64) -> AppResult<()> {
        let mut inner = self.inner.write();
        let review = inner.reviews.get(&review_id).ok_or_else(|| {
            AppError::new(ErrorCode::ReviewNotFound).with_detail("review_id", review_id)
        })?;
        if !can_perform(principal, Action::DeleteReview, Some(review.reviewer_id)) {
            return Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "only the review author can delete it",
            ));
        }

        let pair = (review.reviewer_id, review.business_user_id);
        inner.by_pair.remove(&pair);
        inner.reviews.remove(&review_id);

        info!(review_id, "review deleted");
        Ok(())
    }

    /// List reviews matching `query`, newest-updated first by default.
    pub fn list_reviews(&self, query: &ReviewQuery) -> Vec<Review> {
        let inner = self.inner.read();
        let mut reviews: Vec<Review> = inner
            .reviews
            .values()
            .filter(|r| {
                if let Some(business_user_id) = query.business_user_id
                    && r.business_user_id != business_user_id
                {
                    return false;
                }
                if let Some(reviewer_id) = query.reviewer_id
                    && r.reviewer_id != reviewer_id
                {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        let ordering = query.ordering.unwrap_or(ReviewOrdering::UpdatedAt);
        let descending = query.descending.unwrap_or(true);

        match (ordering, descending) {
            (ReviewOrdering::UpdatedAt, true) => {
                reviews.sort_by_key(|r| (Reverse(r.updated_at), r.id));
            }
            (ReviewOrdering::UpdatedAt, false) => {
                reviews.sort_by_key(|r| (r.updated_at, r.id));
            }
            (ReviewOrdering::Rating, true) => {
                reviews.sort_by_key(|r| (Reverse(r.rating), r.id));
            }
            (ReviewOrdering::Rating, false) => {
                reviews.sort_by_key(|r| (r.rating, r.id));
            }
        }
        reviews
    }

    pub fn review_count(&self) -> usize {
        self.inner.read().reviews.len()
    }

    /// Mean rating across all reviews, rounded to one decimal; 0.0 when empty.
    pub fn average_rating(&self) -> f64 {
        let inner = self.inner.read();
        if inner.reviews.is_empty() {
            return 0.0;
        }
        let sum: i64 = inner.reviews.values().map(|r| i64::from(r.rating)).sum();
        let avg = sum as f64 / inner.reviews.len() as f64;
        (avg * 10.0).round() / 10.0
    }
}
