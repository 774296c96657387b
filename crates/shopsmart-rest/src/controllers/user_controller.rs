//! User profile controller.

use super::parse_id;
use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Router,
};
use shopsmart_core::UserId;
use shopsmart_service::{PublicUserResponse, UpdateProfileRequest, UserResponse};
use tracing::debug;

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/public", get(get_public_profile))
        .route("/:id/profile", patch(update_profile))
}

/// Public profile of a user.
#[utoipa::path(
    get,
    path = "/users/{id}/public",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Public profile", body = PublicUserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PublicUserResponse> {
    let user_id: UserId = parse_id(&id, "user")?;

    let response = state.user_service.get_public_profile(user_id).await?;
    ok(response)
}

/// Update a profile. Users may edit themselves; admins anyone.
#[utoipa::path(
    patch,
    path = "/users/{id}/profile",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 403, description = "Not your profile"),
        (status = 409, description = "Email already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<UserResponse> {
    debug!("Update profile request: {}", id);
    let user_id: UserId = parse_id(&id, "user")?;

    let response = state
        .user_service
        .update_profile(&user.actor(), user_id, request)
        .await?;
    ok(response)
}
