//! Unified error codes for the marketplace core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog (offer) errors
//! - 4xxx: Order errors
//! - 5xxx: Review errors
//! - 6xxx: Account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with transport clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Catalog ====================
    /// Offer not found
    OfferNotFound = 3001,
    /// Offer detail not found
    OfferDetailNotFound = 3002,
    /// Offer is missing a pricing tier
    OfferTierMissing = 3003,
    /// Offer has a duplicate pricing tier
    OfferTierDuplicate = 3004,
    /// Offer detail has a non-positive price
    OfferInvalidPrice = 3005,
    /// Offer detail has a non-positive delivery time
    OfferInvalidDeliveryTime = 3006,
    /// Offer detail has an invalid revision count
    OfferInvalidRevisions = 3007,
    /// Offer is referenced by in-progress orders
    OfferInUse = 3008,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4002,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4003,
    /// Order was modified concurrently
    ConcurrentUpdate = 4004,

    // ==================== 5xxx: Review ====================
    /// Review not found
    ReviewNotFound = 5001,
    /// Reviewer has already reviewed this business
    DuplicateReview = 5002,
    /// Rating outside the 1..=5 range
    RatingOutOfRange = 5003,

    // ==================== 6xxx: Account ====================
    /// User not found
    UserNotFound = 6001,
    /// Username already exists
    UsernameExists = 6002,
    /// Profile not found
    ProfileNotFound = 6003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Catalog
            ErrorCode::OfferNotFound => "Offer not found",
            ErrorCode::OfferDetailNotFound => "Offer detail not found",
            ErrorCode::OfferTierMissing => "Offer is missing a pricing tier",
            ErrorCode::OfferTierDuplicate => "Offer has a duplicate pricing tier",
            ErrorCode::OfferInvalidPrice => "Offer detail price must be positive",
            ErrorCode::OfferInvalidDeliveryTime => "Offer detail delivery time must be positive",
            ErrorCode::OfferInvalidRevisions => "Offer detail revisions must be -1 or greater",
            ErrorCode::OfferInUse => "Offer is referenced by in-progress orders",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::ConcurrentUpdate => "Order was modified concurrently",

            // Review
            ErrorCode::ReviewNotFound => "Review not found",
            ErrorCode::DuplicateReview => "Business has already been reviewed by this user",
            ErrorCode::RatingOutOfRange => "Rating must be between 1 and 5",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::ProfileNotFound => "Profile not found",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),
            7 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Catalog
            3001 => Ok(ErrorCode::OfferNotFound),
            3002 => Ok(ErrorCode::OfferDetailNotFound),
            3003 => Ok(ErrorCode::OfferTierMissing),
            3004 => Ok(ErrorCode::OfferTierDuplicate),
            3005 => Ok(ErrorCode::OfferInvalidPrice),
            3006 => Ok(ErrorCode::OfferInvalidDeliveryTime),
            3007 => Ok(ErrorCode::OfferInvalidRevisions),
            3008 => Ok(ErrorCode::OfferInUse),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyCompleted),
            4003 => Ok(ErrorCode::OrderAlreadyCancelled),
            4004 => Ok(ErrorCode::ConcurrentUpdate),

            // Review
            5001 => Ok(ErrorCode::ReviewNotFound),
            5002 => Ok(ErrorCode::DuplicateReview),
            5003 => Ok(ErrorCode::RatingOutOfRange),

            // Account
            6001 => Ok(ErrorCode::UserNotFound),
            6002 => Ok(ErrorCode::UsernameExists),
            6003 => Ok(ErrorCode::ProfileNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
