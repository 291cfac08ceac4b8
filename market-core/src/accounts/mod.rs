//! Account directory
//!
//! Users and their profiles. Registration creates the user together with
//! an empty profile; the role is fixed at that point and never patched.
//! Usernames are unique, enforced under the write lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;
use tracing::info;

use shared::models::{Principal, Profile, ProfileUpdate, User, UserCreate, UserRole};
use shared::now_ms;

use crate::policy::{Action, can_perform};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_LOCATION_LEN, MAX_TEL_LEN, MAX_TEXT_LEN, MAX_URL_LEN, MAX_USERNAME_LEN,
    MAX_WORKING_HOURS_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Default)]
struct AccountsInner {
    users: HashMap<i64, User>,
    profiles: HashMap<i64, Profile>,
    /// username -> user id, uniqueness index
    by_username: HashMap<String, i64>,
}

/// User and profile directory
pub struct AccountDirectory {
    inner: RwLock<AccountsInner>,
    next_id: AtomicI64,
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(AccountsInner::default()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Register a new user and create their empty profile.
    ///
    /// Fails with `UsernameExists` when the username is already taken.
    pub fn register(&self, payload: UserCreate) -> AppResult<User> {
        validate_required_text(&payload.username, "username", MAX_USERNAME_LEN)?;
        validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
        validate_optional_text(&payload.first_name, "first_name", MAX_USERNAME_LEN)?;
        validate_optional_text(&payload.last_name, "last_name", MAX_USERNAME_LEN)?;

        let mut inner = self.inner.write();
        if inner.by_username.contains_key(&payload.username) {
            return Err(AppError::new(ErrorCode::UsernameExists)
                .with_detail("username", payload.username.clone()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = now_ms();
        let user = User {
            id,
            username: payload.username.clone(),
            first_name: payload.first_name.unwrap_or_default(),
            last_name: payload.last_name.unwrap_or_default(),
            email: payload.email,
            role: payload.role,
            created_at: now,
        };

        inner.by_username.insert(payload.username, id);
        inner.profiles.insert(id, Profile::empty(id, now));
        inner.users.insert(id, user.clone());

        info!(user_id = id, role = %user.role, "user registered");
        Ok(user)
    }

    pub fn get_user(&self, user_id: i64) -> AppResult<User> {
        self.inner
            .read()
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("user_id", user_id))
    }

    pub fn get_profile(&self, user_id: i64) -> AppResult<Profile> {
        self.inner
            .read()
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| {
                AppError::new(ErrorCode::ProfileNotFound).with_detail("user_id", user_id)
            })
    }

    /// Patch a profile. Only the profile owner may do this.
    pub fn update_profile(
        &self,
        principal: &Principal,
        user_id: i64,
        patch: ProfileUpdate,
    ) -> AppResult<Profile> {
        let mut inner = self.inner.write();
        if !inner.profiles.contains_key(&user_id) {
            return Err(AppError::new(ErrorCode::ProfileNotFound).with_detail("user_id", user_id));
        }
        if !can_perform(principal, Action::UpdateProfile, Some(user_id)) {
            return Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "only the profile owner can update it",
            ));
        }

        // Validate only after the permission gate
        validate_optional_text(&patch.file, "file", MAX_URL_LEN)?;
        validate_optional_text(&patch.location, "location", MAX_LOCATION_LEN)?;
        validate_optional_text(&patch.tel, "tel", MAX_TEL_LEN)?;
        validate_optional_text(&patch.description, "description", MAX_TEXT_LEN)?;
        validate_optional_text(&patch.working_hours, "working_hours", MAX_WORKING_HOURS_LEN)?;

        let profile = inner
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound))?;

        if let Some(file) = patch.file {
            profile.file = Some(file);
        }
        if let Some(location) = patch.location {
            profile.location = location;
        }
        if let Some(tel) = patch.tel {
            profile.tel = tel;
        }
        if let Some(description) = patch.description {
            profile.description = description;
        }
        if let Some(working_hours) = patch.working_hours {
            profile.working_hours = working_hours;
        }

        info!(user_id, "profile updated");
        Ok(profile.clone())
    }

    /// Profiles of all users with the given role, id ascending
    pub fn list_profiles(&self, role: UserRole) -> Vec<Profile> {
        let inner = self.inner.read();
        let mut profiles: Vec<Profile> = inner
            .users
            .values()
            .filter(|u| u.role == role)
            .filter_map(|u| inner.profiles.get(&u.id).cloned())
            .collect();
        profiles.sort_by_key(|p| p.user_id);
        profiles
    }

    pub fn business_profile_count(&self) -> usize {
        let inner = self.inner.read();
        inner
            .users
            .values()
            .filter(|u| u.role == UserRole::Business)
            .count()
    }
}
