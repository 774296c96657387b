//! User entity.

use crate::{UserId, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name given to accounts that sign up without one.
pub const DEFAULT_USER_NAME: &str = "User";

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Login email, stored lowercase.
    pub email: String,

    /// Hashed password (never exposed via API).
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// User's role.
    pub role: UserRole,

    /// Profile picture URL.
    pub profile_photo: Option<String>,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user. A blank name falls back to [`DEFAULT_USER_NAME`].
    #[must_use]
    pub fn new(name: Option<String>, email: &str, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
        Self {
            id: UserId::new(),
            name,
            email: normalize_email(email),
            password_hash,
            role,
            profile_photo: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the profile photo URL.
    #[must_use]
    pub fn with_profile_photo(mut self, url: Option<String>) -> Self {
        self.profile_photo = url;
        self
    }

    /// Replaces the password hash.
    pub fn update_password(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Applies a partial profile update.
    pub fn update_profile(&mut self, name: Option<String>, email: Option<&str>, profile_photo: Option<String>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = normalize_email(email);
        }
        if let Some(photo) = profile_photo {
            self.profile_photo = Some(photo);
        }
        self.updated_at = Utc::now();
    }
}

/// Canonical form used for lookups and the unique index.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
