//! Main application router.

use crate::{
    controllers::{admin_controller, auth_controller, health_controller, me_controller, product_controller, user_controller},
    middleware::{auth_middleware, logging_middleware, rate_limit_middleware, AuthMiddlewareState, AuthRateLimiter},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use shopsmart_config::ServerConfig;
use shopsmart_security::TokenProvider;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Everything the router needs besides the services.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub server: ServerConfig,
    pub auth_rate_limiter: AuthRateLimiter,
    /// Directory served under `/uploads`, if images are stored locally.
    pub upload_dir: Option<String>,
}

impl RouterOptions {
    pub fn new(server: ServerConfig) -> Self {
        Self {
            server,
            auth_rate_limiter: AuthRateLimiter::disabled(),
            upload_dir: None,
        }
    }

    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: AuthRateLimiter) -> Self {
        self.auth_rate_limiter = limiter;
        self
    }

    #[must_use]
    pub fn with_upload_dir(mut self, dir: impl Into<String>) -> Self {
        self.upload_dir = Some(dir.into());
        self
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, token_provider: Arc<TokenProvider>, options: &RouterOptions) -> Router {
    let auth_state = AuthMiddlewareState::new(token_provider);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let auth_routes = auth_controller::router().layer(middleware::from_fn_with_state(
        options.auth_rate_limiter.clone(),
        rate_limit_middleware,
    ));

    let api_router = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_controller::router())
        .nest("/products", product_controller::router())
        .nest("/me", me_controller::router())
        .nest("/admin", admin_controller::router())
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let mut router = Router::new()
        .merge(health_controller::router())
        .nest("/api/v1", api_router)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root));

    if let Some(dir) = &options.upload_dir {
        router = router.nest_service("/uploads", ServeDir::new(dir));
    }

    let router = router
        .layer(DefaultBodyLimit::max(options.server.max_body_size))
        .layer(TimeoutLayer::new(options.server.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(&options.server))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer from the server configuration.
fn create_cors_layer(server: &ServerConfig) -> CorsLayer {
    if !server.cors_enabled {
        return CorsLayer::new();
    }
    if server.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "ShopSmart API v1"
}
