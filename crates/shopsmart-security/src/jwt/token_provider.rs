//! JWT token provider for creating and validating tokens.

use super::{Claims, TokenSubject, TokenType};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use shopsmart_config::SecurityConfig;
use shopsmart_core::{ShopError, ShopResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Token pair containing access and refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: i64,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: i64,
    /// Token type (always "Bearer").
    pub token_type: String,
}

/// JWT token provider service.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Generates an access/refresh pair sharing one session id.
    pub fn generate_tokens(&self, subject: &TokenSubject<'_>) -> ShopResult<TokenPair> {
        let session_id = uuid::Uuid::now_v7().to_string();

        let access_expires_at = Utc::now() + seconds(self.config.jwt_access_expiration_secs);
        let refresh_expires_at = Utc::now() + seconds(self.config.jwt_refresh_expiration_secs);

        let access_token = self.sign(&Claims::new(
            subject,
            TokenType::Access,
            &self.config.jwt_issuer,
            &self.config.jwt_audience,
            access_expires_at,
            Some(session_id.clone()),
        ))?;
        let refresh_token = self.sign(&Claims::new(
            subject,
            TokenType::Refresh,
            &self.config.jwt_issuer,
            &self.config.jwt_audience,
            refresh_expires_at,
            Some(session_id),
        ))?;

        debug!("Generated token pair for user {}", subject.user_id);
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at: access_expires_at.timestamp(),
            refresh_expires_at: refresh_expires_at.timestamp(),
            token_type: "Bearer".to_string(),
        })
    }

    /// Generates a short-lived password-reset token.
    pub fn generate_password_reset_token(&self, subject: &TokenSubject<'_>) -> ShopResult<String> {
        let expires_at = Utc::now() + seconds(self.config.password_reset_expiration_secs);
        let token = self.sign(&Claims::new(
            subject,
            TokenType::PasswordReset,
            &self.config.jwt_issuer,
            &self.config.jwt_audience,
            expires_at,
            None,
        ))?;
        debug!("Generated password reset token for user {}", subject.user_id);
        Ok(token)
    }

    fn sign(&self, claims: &Claims) -> ShopResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| ShopError::internal(format!("Failed to generate {} token: {e}", claims.token_type)))
    }

    /// Validates a token and returns the claims.
    pub fn validate_token(&self, token: &str) -> ShopResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => ShopError::TokenExpired,
                ErrorKind::InvalidToken | ErrorKind::InvalidSignature => {
                    ShopError::InvalidToken("Invalid token signature".to_string())
                }
                ErrorKind::InvalidIssuer => ShopError::InvalidToken("Invalid token issuer".to_string()),
                ErrorKind::InvalidAudience => ShopError::InvalidToken("Invalid token audience".to_string()),
                _ => ShopError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> ShopResult<Claims> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(ShopError::InvalidToken(format!("Expected {expected} token")));
        }
        Ok(claims)
    }

    /// Validates an access token specifically.
    pub fn validate_access_token(&self, token: &str) -> ShopResult<Claims> {
        self.validate_typed(token, TokenType::Access)
    }

    /// Validates a refresh token specifically.
    pub fn validate_refresh_token(&self, token: &str) -> ShopResult<Claims> {
        self.validate_typed(token, TokenType::Refresh)
    }

    /// Validates a password-reset token specifically.
    pub fn validate_password_reset_token(&self, token: &str) -> ShopResult<Claims> {
        self.validate_typed(token, TokenType::PasswordReset)
    }

    /// Refreshes a token pair using a refresh token.
    pub fn refresh_tokens(&self, refresh_token: &str) -> ShopResult<TokenPair> {
        let claims = self.validate_refresh_token(refresh_token)?;
        self.generate_tokens(&TokenSubject {
            user_id: claims.user_id(),
            name: &claims.name,
            email: &claims.email,
            role: claims.role,
        })
    }
}

fn seconds(secs: u64) -> Duration {
    Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1000))
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopsmart_core::{UserId, UserRole};

    fn create_test_provider() -> TokenProvider {
        let config = SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            jwt_access_expiration_secs: 3600,
            jwt_refresh_expiration_secs: 86400,
            password_reset_expiration_secs: 600,
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            ..Default::default()
        };
        TokenProvider::new(Arc::new(config))
    }

    fn subject(user_id: UserId) -> TokenSubject<'static> {
        TokenSubject {
            user_id,
            name: "Ravi",
            email: "ravi@example.com",
            role: UserRole::User,
        }
    }

    #[test]
    fn test_generate_and_validate_tokens() {
        let provider = create_test_provider();
        let user_id = UserId::new();

        let tokens = provider.generate_tokens(&subject(user_id)).unwrap();

        let claims = provider.validate_access_token(&tokens.access_token).unwrap();
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.name, "Ravi");

        let refresh_claims = provider.validate_refresh_token(&tokens.refresh_token).unwrap();
        assert!(refresh_claims.is_refresh_token());
        assert_eq!(claims.session_id, refresh_claims.session_id);
        assert_eq!(tokens.token_type, "Bearer");
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let provider = create_test_provider();
        let user_id = UserId::new();
        let tokens = provider.generate_tokens(&subject(user_id)).unwrap();
        let reset = provider.generate_password_reset_token(&subject(user_id)).unwrap();

        assert!(provider.validate_access_token(&tokens.refresh_token).is_err());
        assert!(provider.validate_refresh_token(&tokens.access_token).is_err());
        assert!(provider.validate_access_token(&reset).is_err());
        assert!(provider.validate_password_reset_token(&tokens.access_token).is_err());
        assert_eq!(provider.validate_password_reset_token(&reset).unwrap().user_id(), user_id);
    }

    #[test]
    fn test_refresh_tokens() {
        let provider = create_test_provider();
        let tokens = provider.generate_tokens(&subject(UserId::new())).unwrap();

        let new_tokens = provider.refresh_tokens(&tokens.refresh_token).unwrap();
        assert_ne!(tokens.access_token, new_tokens.access_token);
        assert!(provider.refresh_tokens(&tokens.access_token).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let provider = create_test_provider();
        assert!(matches!(
            provider.validate_token("invalid-token"),
            Err(ShopError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let provider = create_test_provider();
        let other = TokenProvider::new(Arc::new(SecurityConfig {
            jwt_secret: "a-completely-different-secret".to_string(),
            jwt_issuer: "test-issuer".to_string(),
            jwt_audience: "test-audience".to_string(),
            ..Default::default()
        }));
        let tokens = other.generate_tokens(&subject(UserId::new())).unwrap();
        assert!(provider.validate_access_token(&tokens.access_token).is_err());
    }
}
