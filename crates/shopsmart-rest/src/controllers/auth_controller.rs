//! Authentication controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, ok, ApiResult, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    routing::{post, put},
    Router,
};
use serde::Deserialize;
use shopsmart_service::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RefreshTokenRequest, ResetPasswordRequest,
    SignupRequest,
};
use tracing::debug;
use utoipa::IntoParams;

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", put(reset_password))
}

/// Token carried by the password-reset link.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResetTokenQuery {
    pub token: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Unknown role"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> CreatedResult<MessageResponse> {
    debug!("Signup request for: {}", request.email);

    let response = state.auth_service.signup(request).await?;
    created(response)
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    debug!("Login request for: {}", request.email);

    let response = state.auth_service.login(request).await?;
    ok(response)
}

/// Exchange a refresh token for a new token pair.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = AuthResponse),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<AuthResponse> {
    debug!("Token refresh request");

    let response = state.auth_service.refresh_token(request).await?;
    ok(response)
}

/// Mail a password-reset link.
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 404, description = "No account for this email")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<MessageResponse> {
    debug!("Password reset requested for: {}", request.email);

    let response = state.auth_service.forgot_password(request).await?;
    ok(response)
}

/// Set a new password using the token from the reset link.
#[utoipa::path(
    put,
    path = "/auth/reset-password",
    tag = "auth",
    params(ResetTokenQuery),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 401, description = "Invalid or expired reset token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Query(query): Query<ResetTokenQuery>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<MessageResponse> {
    let response = state.auth_service.reset_password(&query.token, request).await?;
    ok(response)
}
