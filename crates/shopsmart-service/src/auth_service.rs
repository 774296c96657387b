//! Authentication service trait definition.

use crate::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RefreshTokenRequest, ResetPasswordRequest,
    SignupRequest,
};
use async_trait::async_trait;
use shopsmart_core::{Interface, ShopResult};
use shopsmart_security::Claims;

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Interface + Send + Sync {
    /// Registers a new account.
    async fn signup(&self, request: SignupRequest) -> ShopResult<MessageResponse>;

    /// Logs in with email and password.
    async fn login(&self, request: LoginRequest) -> ShopResult<AuthResponse>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh_token(&self, request: RefreshTokenRequest) -> ShopResult<AuthResponse>;

    /// Mails a password reset link.
    async fn forgot_password(&self, request: ForgotPasswordRequest) -> ShopResult<MessageResponse>;

    /// Sets a new password using a reset token.
    async fn reset_password(&self, token: &str, request: ResetPasswordRequest) -> ShopResult<MessageResponse>;

    /// Validates an access token and returns claims.
    async fn validate_token(&self, token: &str) -> ShopResult<Claims>;
}
