//! OpenAPI documentation served through Swagger UI.

use crate::controllers::{HealthResponse, ReadinessResponse};
use shopsmart_core::{
    ErrorResponse, FieldError, Order, OrderId, OrderStatus, PaymentMode, PaymentStatus, PriceSort, Product,
    ProductId, ShippingAddress, UserId, UserRole,
};
use shopsmart_service::{
    AddReviewRequest, AuthResponse, AuthUserInfo, CartLineResponse, CartResponse, ForgotPasswordRequest,
    LoginRequest, MessageResponse, OwnerSummary, PlaceOrderRequest, ProductDetailsResponse, ProductListResponse,
    PublicUserResponse, RefreshTokenRequest, ResetPasswordRequest, ReviewResponse, ReviewerSummary, SignupRequest,
    StockCheckResponse, StockStatus, UpdateOrderStatusRequest, UpdateProductRequest, UpdateProfileRequest,
    UserListResponse, UserResponse, WishlistLineResponse, WishlistResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the ShopSmart API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShopSmart API",
        version = "1.0.0",
        description = "Catalog, cart, orders and reviews for the ShopSmart store",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::auth_controller::signup,
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::refresh_token,
        crate::controllers::auth_controller::forgot_password,
        crate::controllers::auth_controller::reset_password,
        crate::controllers::user_controller::get_public_profile,
        crate::controllers::user_controller::update_profile,
        crate::controllers::product_controller::list_products,
        crate::controllers::product_controller::create_product,
        crate::controllers::product_controller::get_product,
        crate::controllers::product_controller::update_product,
        crate::controllers::product_controller::delete_product,
        crate::controllers::product_controller::get_product_details,
        crate::controllers::product_controller::add_review,
        crate::controllers::me_controller::get_cart,
        crate::controllers::me_controller::add_to_cart,
        crate::controllers::me_controller::remove_from_cart,
        crate::controllers::me_controller::get_wishlist,
        crate::controllers::me_controller::add_to_wishlist,
        crate::controllers::me_controller::remove_from_wishlist,
        crate::controllers::me_controller::order_history,
        crate::controllers::me_controller::place_order,
        crate::controllers::admin_controller::list_users,
        crate::controllers::admin_controller::update_order_status,
        crate::controllers::admin_controller::stock_check,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            // Core types
            UserId,
            ProductId,
            OrderId,
            UserRole,
            OrderStatus,
            PaymentMode,
            PaymentStatus,
            PriceSort,
            ShippingAddress,
            Product,
            Order,
            ErrorResponse,
            FieldError,
            // Auth
            SignupRequest,
            LoginRequest,
            RefreshTokenRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            AuthResponse,
            AuthUserInfo,
            MessageResponse,
            // Users
            UpdateProfileRequest,
            PublicUserResponse,
            UserResponse,
            UserListResponse,
            OwnerSummary,
            ReviewerSummary,
            // Catalog
            UpdateProductRequest,
            ProductListResponse,
            ProductDetailsResponse,
            ReviewResponse,
            AddReviewRequest,
            StockCheckResponse,
            StockStatus,
            // Shopping
            CartResponse,
            CartLineResponse,
            WishlistResponse,
            WishlistLineResponse,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            // Health
            HealthResponse,
            ReadinessResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup, login and password reset"),
        (name = "users", description = "User profiles"),
        (name = "products", description = "Catalog and reviews"),
        (name = "me", description = "Cart, wishlist and orders of the caller"),
        (name = "admin", description = "Administration"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme referenced by `security(("bearer_auth" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token"))
                        .build(),
                ),
            );
        }
    }
}
