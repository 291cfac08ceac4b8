//! Profile Model

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Profile entity (one per user)
///
/// Business users fill in company info; customer profiles usually carry
/// identity only. The image field stores an opaque reference, never bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    /// Profile picture reference (URL or storage key)
    pub file: Option<String>,
    pub location: String,
    pub tel: String,
    pub description: String,
    pub working_hours: String,
    pub created_at: Timestamp,
}

impl Profile {
    /// Empty profile created alongside the user
    pub fn empty(user_id: i64, created_at: Timestamp) -> Self {
        Self {
            user_id,
            file: None,
            location: String::new(),
            tel: String::new(),
            description: String::new(),
            working_hours: String::new(),
            created_at,
        }
    }
}

/// Update profile payload (owner only; role is not patchable)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub file: Option<String>,
    pub location: Option<String>,
    pub tel: Option<String>,
    pub description: Option<String>,
    pub working_hours: Option<String>,
}
