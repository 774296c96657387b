//! Admin-only endpoints.

use super::parse_id;
use crate::{
    extractors::{AuthenticatedUser, PaginationQuery, ValidatedJson},
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Router,
};
use shopsmart_core::{Order, OrderId, ProductId};
use shopsmart_service::{StockCheckResponse, UpdateOrderStatusRequest, UserListResponse};
use tracing::debug;

/// Creates the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/orders/:id/status", patch(update_order_status))
        .route("/products/:id/stock-check", post(stock_check))
}

/// Page through all users.
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<UserListResponse> {
    let response = state.user_service.list_users(&user.actor(), pagination.into()).await?;
    ok(response)
}

/// Move an order along its lifecycle.
#[utoipa::path(
    patch,
    path = "/admin/orders/{id}/status",
    tag = "admin",
    params(("id" = String, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Illegal status transition"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateOrderStatusRequest>,
) -> ApiResult<Order> {
    debug!("Order {} status change to {:?}", id, request.status);
    let order_id: OrderId = parse_id(&id, "order")?;

    let order = state
        .order_service
        .update_status(&user.actor(), order_id, request)
        .await?;
    ok(order)
}

/// Check one product's stock and alert the admin mailbox when it is low.
#[utoipa::path(
    post,
    path = "/admin/products/{id}/stock-check",
    tag = "admin",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Stock status", body = StockCheckResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn stock_check(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<StockCheckResponse> {
    let product_id: ProductId = parse_id(&id, "product")?;

    let response = state.product_service.stock_checkup(&user.actor(), product_id).await?;
    ok(response)
}
