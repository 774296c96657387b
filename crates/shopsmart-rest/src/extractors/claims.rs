//! JWT claims extractor.

use crate::responses::error_response;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use shopsmart_core::{Actor, ErrorResponse, ShopError};
use shopsmart_security::{Claims, ClaimsExt};

/// Caller authenticated by [`crate::middleware::auth_middleware`].
///
/// Rejects with 401 when the request carried no valid access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    /// The caller as a service-layer actor.
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection for [`AuthenticatedUser`].
#[derive(Debug)]
pub struct AuthError(ShopError);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
        error_response(status, ErrorResponse::from_error(&self.0))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AuthError(ShopError::unauthorized("Missing or invalid access token")))
    }
}
