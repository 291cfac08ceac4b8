//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits follow the relational schema the external store enforces.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Usernames
pub const MAX_USERNAME_LEN: usize = 150;

/// Offer, detail and order titles
pub const MAX_TITLE_LEN: usize = 255;

/// Descriptions (offers, profiles, reviews)
pub const MAX_TEXT_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Telephone numbers
pub const MAX_TEL_LEN: usize = 20;

/// Locations
pub const MAX_LOCATION_LEN: usize = 255;

/// Business working hours strings
pub const MAX_WORKING_HOURS_LEN: usize = 100;

/// Image references / URLs
pub const MAX_URL_LEN: usize = 2048;

/// One feature line of a pricing tier
pub const MAX_FEATURE_LEN: usize = 255;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}
