//! Catalog controller.

use super::parse_id;
use crate::{
    extractors::{AuthenticatedUser, ProductForm, ValidatedJson},
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use shopsmart_core::{Product, ProductId};
use shopsmart_service::{
    AddReviewRequest, ProductDetailsResponse, ProductListResponse, ProductQuery, UpdateProductRequest,
};
use tracing::debug;

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/:id/details", get(get_product_details))
        .route("/:id/reviews", post(add_review))
}

/// List products. Sellers only see their own.
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Page of products", body = ProductListResponse),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ProductQuery>,
) -> ApiResult<ProductListResponse> {
    let response = state.product_service.list_products(&user.actor(), query).await?;
    ok(response)
}

/// Create a product from a multipart form with an `image` file part.
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body(content_type = "multipart/form-data", description = "Product fields and image"),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Missing image or bad field"),
        (status = 403, description = "Only sellers and admins add products")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    form: ProductForm,
) -> CreatedResult<Product> {
    debug!("Create product request: {}", form.request.name);

    let product = state
        .product_service
        .create_product(&user.actor(), form.request, form.image)
        .await?;
    created(product)
}

/// Get a product as its owner or an admin.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let product_id: ProductId = parse_id(&id, "product")?;

    let product = state.product_service.get_product(&user.actor(), product_id).await?;
    ok(product)
}

/// Update a product's fields.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<Product> {
    debug!("Update product request: {}", id);
    let product_id: ProductId = parse_id(&id, "product")?;

    let product = state
        .product_service
        .update_product(&user.actor(), product_id, request)
        .await?;
    ok(product)
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete product request: {}", id);
    let product_id: ProductId = parse_id(&id, "product")?;

    state.product_service.delete_product(&user.actor(), product_id).await?;
    Ok(no_content())
}

/// Public product page: product, owner and reviews.
#[utoipa::path(
    get,
    path = "/products/{id}/details",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ProductDetailsResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProductDetailsResponse> {
    let product_id: ProductId = parse_id(&id, "product")?;

    let details = state.product_service.get_product_details(product_id).await?;
    ok(details)
}

/// Rate and review a product. A second review by the same user replaces the first.
#[utoipa::path(
    post,
    path = "/products/{id}/reviews",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    request_body = AddReviewRequest,
    responses(
        (status = 200, description = "Updated product details", body = ProductDetailsResponse),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Rating out of range")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<AddReviewRequest>,
) -> ApiResult<ProductDetailsResponse> {
    let product_id: ProductId = parse_id(&id, "product")?;

    let details = state
        .review_service
        .add_review(&user.actor(), product_id, request)
        .await?;
    ok(details)
}
