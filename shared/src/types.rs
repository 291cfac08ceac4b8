//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Current time as Unix milliseconds
pub fn now_ms() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}
