//! Cart, wishlist and order history of the caller.

use super::parse_id;
use crate::{
    extractors::{AuthenticatedUser, ValidatedJson},
    responses::{created, ok, ApiResult, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Router,
};
use shopsmart_core::{Order, ProductId};
use shopsmart_service::{CartResponse, PlaceOrderRequest, WishlistResponse};
use tracing::debug;

/// Creates the `/me` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/:product_id", put(add_to_cart).delete(remove_from_cart))
        .route("/wishlist", get(get_wishlist))
        .route("/wishlist/:product_id", put(add_to_wishlist).delete(remove_from_wishlist))
        .route("/orders", get(order_history).post(place_order))
}

#[utoipa::path(
    get,
    path = "/me/cart",
    tag = "me",
    responses((status = 200, description = "Cart with product data", body = CartResponse)),
    security(("bearer_auth" = []))
)]
pub async fn get_cart(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<CartResponse> {
    let cart = state.cart_service.get_cart(&user.actor()).await?;
    ok(cart)
}

/// Add one unit of a product to the cart.
#[utoipa::path(
    put,
    path = "/me/cart/{product_id}",
    tag = "me",
    params(("product_id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(product_id): Path<String>,
) -> ApiResult<CartResponse> {
    let product_id: ProductId = parse_id(&product_id, "product")?;

    let cart = state.cart_service.add_to_cart(&user.actor(), product_id).await?;
    ok(cart)
}

/// Remove a product line from the cart.
#[utoipa::path(
    delete,
    path = "/me/cart/{product_id}",
    tag = "me",
    params(("product_id" = String, Path, description = "Product ID")),
    responses((status = 200, description = "Remaining cart", body = CartResponse)),
    security(("bearer_auth" = []))
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(product_id): Path<String>,
) -> ApiResult<CartResponse> {
    let product_id: ProductId = parse_id(&product_id, "product")?;

    let cart = state.cart_service.remove_from_cart(&user.actor(), product_id).await?;
    ok(cart)
}

#[utoipa::path(
    get,
    path = "/me/wishlist",
    tag = "me",
    responses((status = 200, description = "Wishlist with product data", body = WishlistResponse)),
    security(("bearer_auth" = []))
)]
pub async fn get_wishlist(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<WishlistResponse> {
    let wishlist = state.wishlist_service.get_wishlist(&user.actor()).await?;
    ok(wishlist)
}

#[utoipa::path(
    put,
    path = "/me/wishlist/{product_id}",
    tag = "me",
    params(("product_id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Updated wishlist", body = WishlistResponse),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(product_id): Path<String>,
) -> ApiResult<WishlistResponse> {
    let product_id: ProductId = parse_id(&product_id, "product")?;

    let wishlist = state.wishlist_service.add_to_wishlist(&user.actor(), product_id).await?;
    ok(wishlist)
}

#[utoipa::path(
    delete,
    path = "/me/wishlist/{product_id}",
    tag = "me",
    params(("product_id" = String, Path, description = "Product ID")),
    responses((status = 200, description = "Remaining wishlist", body = WishlistResponse)),
    security(("bearer_auth" = []))
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(product_id): Path<String>,
) -> ApiResult<WishlistResponse> {
    let product_id: ProductId = parse_id(&product_id, "product")?;

    let wishlist = state
        .wishlist_service
        .remove_from_wishlist(&user.actor(), product_id)
        .await?;
    ok(wishlist)
}

/// Orders placed by the caller, newest first.
#[utoipa::path(
    get,
    path = "/me/orders",
    tag = "me",
    responses((status = 200, description = "Order history", body = [Order])),
    security(("bearer_auth" = []))
)]
pub async fn order_history(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<Vec<Order>> {
    let orders = state.order_service.order_history(&user.actor()).await?;
    ok(orders)
}

/// Buy a product.
#[utoipa::path(
    post,
    path = "/me/orders",
    tag = "me",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Insufficient stock"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<PlaceOrderRequest>,
) -> CreatedResult<Order> {
    debug!("Order request for product {} x{}", request.product_id, request.quantity);

    let order = state.order_service.place_order(&user.actor(), request).await?;
    created(order)
}
