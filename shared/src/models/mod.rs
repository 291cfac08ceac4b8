//! Data models
//!
//! Shared between the engine crate and the transport layer.
//! All IDs are `i64`; timestamps are Unix milliseconds.

pub mod offer;
pub mod order;
pub mod profile;
pub mod review;
pub mod stats;
pub mod user;

// Re-exports
pub use offer::*;
pub use order::*;
pub use profile::*;
pub use review::*;
pub use stats::*;
pub use user::*;
