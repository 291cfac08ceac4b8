//! HTTP status code mapping for error codes
//!
//! The transport layer is out of scope here, but the mapping must be
//! deterministic so whatever serves these errors can pick 403 vs 404 vs 409
//! without inspecting messages.

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OfferNotFound
            | Self::OfferDetailNotFound
            | Self::OrderNotFound
            | Self::ReviewNotFound
            | Self::UserNotFound
            | Self::ProfileNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (uniqueness / concurrency violations)
            Self::AlreadyExists
            | Self::OfferInUse
            | Self::ConcurrentUpdate
            | Self::DuplicateReview
            | Self::UsernameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired | Self::AdminRequired => {
                StatusCode::FORBIDDEN
            }

            // 422 Unprocessable (illegal state transitions)
            Self::OrderAlreadyCompleted | Self::OrderAlreadyCancelled => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 500 Internal Server Error
            Self::InternalError | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
