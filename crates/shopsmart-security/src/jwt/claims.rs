//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopsmart_core::{UserId, UserRole};
use uuid::Uuid;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,

    /// User ID as UUID.
    pub user_id: Uuid,

    /// User's display name.
    pub name: String,

    /// User's email.
    pub email: String,

    /// User's role.
    pub role: UserRole,

    /// What the token may be used for.
    pub token_type: TokenType,

    /// Issued at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Not before timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// JWT ID (unique identifier for this token).
    pub jti: String,

    /// Session shared by an access/refresh pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Identity embedded in a token.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: UserId,
    pub name: &'a str,
    pub email: &'a str,
    pub role: UserRole,
}

impl Claims {
    /// Creates claims of the given type for `subject`.
    #[must_use]
    pub fn new(
        subject: &TokenSubject<'_>,
        token_type: TokenType,
        issuer: &str,
        audience: &str,
        expires_at: DateTime<Utc>,
        session_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.user_id.to_string(),
            user_id: subject.user_id.into_inner(),
            name: subject.name.to_string(),
            email: subject.email.to_string(),
            role: subject.role,
            token_type,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            nbf: Some(now.timestamp()),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::now_v7().to_string(),
            session_id,
        }
    }

    /// Returns the user ID.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::from_uuid(self.user_id)
    }

    /// Checks if the token is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks if this is an access token.
    #[must_use]
    pub const fn is_access_token(&self) -> bool {
        matches!(self.token_type, TokenType::Access)
    }

    /// Checks if this is a refresh token.
    #[must_use]
    pub const fn is_refresh_token(&self) -> bool {
        matches!(self.token_type, TokenType::Refresh)
    }

    /// Checks if this is a password-reset token.
    #[must_use]
    pub const fn is_password_reset_token(&self) -> bool {
        matches!(self.token_type, TokenType::PasswordReset)
    }
}

/// Token type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Access token (short-lived, used for API requests).
    Access,
    /// Refresh token (long-lived, used to obtain new access tokens).
    Refresh,
    /// Single-purpose token mailed with a password-reset link.
    PasswordReset,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
            Self::PasswordReset => write!(f, "password_reset"),
        }
    }
}
