//! Unified error system for the marketplace core
//!
//! - [`ErrorCode`]: standardized error codes for all error types
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: rich error type with codes, messages and details
//! - [`ApiResponse`]: unified response envelope for the transport seam
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog errors
//! - 4xxx: Order errors
//! - 5xxx: Review errors
//! - 6xxx: Account errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ApiResponse, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::RatingOutOfRange, "rating 9 is out of range")
//!     .with_detail("rating", 9);
//!
//! assert_eq!(err.http_status().as_u16(), 400);
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(5003));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
