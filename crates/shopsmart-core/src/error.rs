//! The store's single error type and its JSON body.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by every repository, service and handler of the store.
///
/// The REST layer maps each variant to an HTTP status through
/// [`ShopError::status_code`] and to a stable code through
/// [`ShopError::error_code`].
#[derive(Error, Debug)]
pub enum ShopError {
    /// No row with this id, or one the caller may not see.
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Malformed request input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique key taken, such as a registered email.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Well-formed request the store refuses: short stock, illegal status move.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role or ownership does not allow it.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    /// Unknown email or wrong password; the two are not told apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Mail relay, payment gateway or image storage failed.
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::BusinessRule(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_) | Self::InvalidToken(_) | Self::TokenExpired | Self::InvalidCredentials => 401,
            Self::Forbidden(_) => 403,
            Self::RateLimitExceeded => 429,
            Self::ExternalService { .. } => 502,
            Self::Database(_) | Self::Configuration(_) | Self::Cache(_) | Self::Internal(_) => 500,
        }
    }

    /// Code carried in the `code` field of error bodies.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidToken(_) => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    #[must_use]
    pub fn business_rule<T: Into<String>>(message: T) -> Self {
        Self::BusinessRule(message.into())
    }

    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    #[must_use]
    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::Forbidden(message.into())
    }

    /// `service` names the integration, e.g. `"mail"` or `"payment"`.
    #[must_use]
    pub fn external<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// True for infrastructure failures a scheduled job may outlive.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::ExternalService { .. } | Self::Cache(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ShopError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // 1062 is MySQL's duplicate entry; 23000 its SQLSTATE class
                if db_err.code().is_some_and(|code| code == "1062" || code == "23000") {
                    return Self::Conflict(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

/// Cached values that no longer decode surface as internal errors.
impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {err}"))
    }
}

/// Body of every failed response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    /// Per-field failures, present for request validation errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// One failed validation rule on one request field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// Rule code, e.g. `"email"` or `"price_scale"`.
    pub code: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn from_error(error: &ShopError) -> Self {
        Self::new(error.error_code(), error.to_string())
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(ShopError::not_found("Product", 1).status_code(), 404);
        assert_eq!(ShopError::validation("price is required").status_code(), 400);
        assert_eq!(ShopError::business_rule("insufficient stock").status_code(), 400);
        assert_eq!(ShopError::unauthorized("not logged in").status_code(), 401);
        assert_eq!(ShopError::TokenExpired.status_code(), 401);
        assert_eq!(ShopError::InvalidCredentials.status_code(), 401);
        assert_eq!(ShopError::forbidden("not the owner").status_code(), 403);
        assert_eq!(ShopError::conflict("email taken").status_code(), 409);
        assert_eq!(ShopError::RateLimitExceeded.status_code(), 429);
    }

    #[test]
    fn test_integration_failures_are_502_and_retriable() {
        let err = ShopError::external("payment", "gateway down");
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
        assert!(err.is_retriable());
        assert!(ShopError::Database("deadlock".to_string()).is_retriable());
        assert!(!ShopError::business_rule("insufficient stock").is_retriable());
        assert_eq!(ShopError::Cache("redis down".to_string()).status_code(), 500);
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let message = ShopError::not_found("Product", "abc").to_string();
        assert!(message.contains("Product"));
        assert!(message.contains("abc"));
    }

    #[test]
    fn test_response_body_omits_missing_details() {
        let json = serde_json::to_value(ErrorResponse::from_error(&ShopError::TokenExpired)).unwrap();
        assert_eq!(json["code"], "TOKEN_EXPIRED");
        assert!(json.get("details").is_none());

        let with_fields = ErrorResponse::from_error(&ShopError::validation("bad input")).with_details(vec![FieldError {
            field: "price".to_string(),
            message: "at most two decimal places".to_string(),
            code: "price_scale".to_string(),
        }]);
        let json = serde_json::to_value(with_fields).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"][0]["field"], "price");
    }
}
