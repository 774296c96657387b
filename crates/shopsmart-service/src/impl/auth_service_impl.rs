//! Authentication service implementation.

use crate::auth_service::AuthService;
use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{
    AuthResponse, AuthUserInfo, ForgotPasswordRequest, LoginRequest, MessageResponse, RefreshTokenRequest,
    ResetPasswordRequest, SignupRequest,
};
use crate::integrations::{MailMessage, Mailer};
use async_trait::async_trait;
use shopsmart_config::MailConfig;
use shopsmart_core::{ShopError, ShopResult, User, UserRole, ValidateExt};
use shopsmart_repository::UserRepository;
use shopsmart_security::{Claims, PasswordHasherInterface, TokenProvider, TokenSubject};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication service implementation.
pub struct AuthServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasherInterface>,
    token_provider: Arc<TokenProvider>,
    mailer: Arc<dyn Mailer>,
    cache: Arc<dyn CacheInterface>,
    mail_config: Arc<MailConfig>,
}

impl AuthServiceImpl {
    /// Creates a new authentication service.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        token_provider: Arc<TokenProvider>,
        mailer: Arc<dyn Mailer>,
        cache: Arc<dyn CacheInterface>,
        mail_config: Arc<MailConfig>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_provider,
            mailer,
            cache,
            mail_config,
        }
    }

    fn subject(user: &User) -> TokenSubject<'_> {
        TokenSubject {
            user_id: user.id,
            name: &user.name,
            email: &user.email,
            role: user.role,
        }
    }

    /// Creates an auth response for a user.
    fn create_auth_response(&self, user: &User) -> ShopResult<AuthResponse> {
        let tokens = self.token_provider.generate_tokens(&Self::subject(user))?;

        Ok(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.access_expires_at - chrono::Utc::now().timestamp(),
            refresh_expires_at: tokens.refresh_expires_at,
            user: AuthUserInfo::from(user),
        })
    }
}

impl std::fmt::Debug for AuthServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceImpl").finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn signup(&self, request: SignupRequest) -> ShopResult<MessageResponse> {
        debug!("Signing up: {}", request.email);

        request.validate_request()?;

        let role: UserRole = request
            .role
            .parse()
            .map_err(|_| ShopError::validation("Role does not exist"))?;

        if self.user_repository.exists_by_email(&request.email).await? {
            return Err(ShopError::conflict(format!("Email '{}' is already registered", request.email)));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let user = User::new(request.name, &request.email, password_hash, role)
            .with_profile_photo(request.profile_photo);

        let saved = self.user_repository.save(&user).await?;
        self.cache.try_invalidate(&cache_keys::user_write(saved.id)).await;

        info!("User registered: {} ({})", saved.id, saved.role);
        Ok(MessageResponse::new("User registered successfully"))
    }

    async fn login(&self, request: LoginRequest) -> ShopResult<AuthResponse> {
        debug!("Login attempt for: {}", request.email);

        request.validate_request()?;

        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email - {}", request.email);
                ShopError::InvalidCredentials
            })?;

        if !self.password_hasher.verify(&request.password, &user.password_hash)? {
            warn!("Login failed: invalid password - {}", user.id);
            return Err(ShopError::InvalidCredentials);
        }

        info!("User logged in: {}", user.id);
        self.create_auth_response(&user)
    }

    async fn refresh_token(&self, request: RefreshTokenRequest) -> ShopResult<AuthResponse> {
        debug!("Refreshing token");

        request.validate_request()?;

        let claims = self.token_provider.validate_refresh_token(&request.refresh_token)?;

        // Re-read the user so a changed role or email lands in the new tokens.
        let user = self
            .user_repository
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| ShopError::InvalidToken("User no longer exists".to_string()))?;

        self.create_auth_response(&user)
    }

    async fn forgot_password(&self, request: ForgotPasswordRequest) -> ShopResult<MessageResponse> {
        debug!("Password reset requested for: {}", request.email);

        request.validate_request()?;

        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ShopError::not_found("User", &request.email))?;

        let token = self
            .token_provider
            .generate_password_reset_token(&Self::subject(&user))?;
        let link = format!("{}?token={}", self.mail_config.reset_link_base, token);

        self.mailer.send(MailMessage::password_reset(&user, &link)).await?;

        info!("Password reset link sent to user {}", user.id);
        Ok(MessageResponse::new("Password reset link sent to your email"))
    }

    async fn reset_password(&self, token: &str, request: ResetPasswordRequest) -> ShopResult<MessageResponse> {
        request.validate_request()?;

        let claims = self.token_provider.validate_password_reset_token(token)?;

        let mut user = self
            .user_repository
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| ShopError::InvalidToken("User no longer exists".to_string()))?;

        let password_hash = self.password_hasher.hash(&request.new_password)?;
        user.update_password(password_hash);
        self.user_repository.update(&user).await?;
        self.cache.try_invalidate(&cache_keys::user_write(user.id)).await;

        info!("Password reset for user {}", user.id);
        Ok(MessageResponse::new("Password updated successfully"))
    }

    async fn validate_token(&self, token: &str) -> ShopResult<Claims> {
        self.token_provider.validate_access_token(token)
    }
}
