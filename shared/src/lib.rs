//! Shared types for the marketplace core
//!
//! Common types used by the engine crate and (eventually) a transport
//! layer: data models, the unified error system and utility types.

pub mod error;
pub mod models;
pub mod types;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use types::{Timestamp, now_ms};
