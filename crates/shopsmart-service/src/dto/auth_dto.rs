//! Authentication-related DTOs.

use serde::{Deserialize, Serialize};
use shopsmart_core::{User, UserId, UserRole};
use utoipa::ToSchema;
use validator::Validate;

/// Signup request.
///
/// `role` stays a string so an unknown role is reported as a validation
/// error by the service rather than as a malformed body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(max = 64, message = "Name cannot exceed 64 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[schema(example = "user")]
    pub role: String,

    #[validate(url(message = "Invalid profile photo URL"))]
    pub profile_photo: Option<String>,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request for a password reset link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// New password submitted with a reset token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Authentication response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub refresh_expires_at: i64,
    pub user: AuthUserInfo,
}

/// User info included in auth response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserInfo {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile_photo: Option<String>,
}

impl From<&User> for AuthUserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            profile_photo: user.profile_photo.clone(),
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_valid() {
        let request = SignupRequest {
            name: Some("Asha".to_string()),
            email: "asha@example.com".to_string(),
            password: "secret1".to_string(),
            role: "seller".to_string(),
            profile_photo: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_request_short_password() {
        let request = SignupRequest {
            name: None,
            email: "asha@example.com".to_string(),
            password: "12345".to_string(),
            role: "user".to_string(),
            profile_photo: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_login_request_invalid_email() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
