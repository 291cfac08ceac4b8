//! User Model

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// User role, fixed at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Business,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Business => "business",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Immutable after creation
    pub role: UserRole,
    pub created_at: Timestamp,
}

/// Register user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub role: UserRole,
}

/// Authenticated actor issuing a request
///
/// Resolved by the transport layer from an opaque token before the core is
/// invoked; the core never parses tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    pub role: UserRole,
}

impl Principal {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn customer(user_id: i64) -> Self {
        Self::new(user_id, UserRole::Customer)
    }

    pub fn business(user_id: i64) -> Self {
        Self::new(user_id, UserRole::Business)
    }

    pub fn admin(user_id: i64) -> Self {
        Self::new(user_id, UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&UserRole::Business).unwrap(),
            "\"business\""
        );
        let role: UserRole = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, UserRole::Customer);
    }

    #[test]
    fn test_principal_constructors() {
        assert_eq!(Principal::admin(1).role, UserRole::Admin);
        assert_eq!(Principal::customer(2).user_id, 2);
    }
}
