//! Access policy
//!
//! Single pure function mapping (principal, action, resource owner) to
//! allowed/denied. Consulted synchronously before every mutation; callers
//! decide how a denial surfaces (403 vs 404) since this function is total
//! and never fails.

use shared::models::{Principal, UserRole};

/// Mutating actions gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateOffer,
    UpdateOffer,
    DeleteOffer,
    PlaceOrder,
    UpdateOrderStatus,
    DeleteOrder,
    CreateReview,
    UpdateReview,
    DeleteReview,
    UpdateProfile,
}

/// Check whether `principal` may perform `action`.
///
/// `owner` is the resource's recorded owner where the action is
/// ownership-gated: the offer creator, the order's business user, the
/// review's author or the profile's user. Role-gated actions ignore it.
pub fn can_perform(principal: &Principal, action: Action, owner: Option<i64>) -> bool {
    match action {
        // Role-gated creation
        Action::CreateOffer => principal.role == UserRole::Business,
        Action::PlaceOrder | Action::CreateReview => principal.role == UserRole::Customer,

        // Admin-only
        Action::DeleteOrder => principal.role == UserRole::Admin,

        // Ownership-gated mutation
        Action::UpdateOffer
        | Action::DeleteOffer
        | Action::UpdateOrderStatus
        | Action::UpdateReview
        | Action::DeleteReview
        | Action::UpdateProfile => owner == Some(principal.user_id),
    }
}
