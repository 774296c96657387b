//! Product service trait definition.

use crate::dto::{
    CreateProductRequest, ImageUpload, ProductDetailsResponse, ProductListResponse, ProductQuery, StockCheckResponse,
    UpdateProductRequest,
};
use async_trait::async_trait;
use shopsmart_core::{Actor, Interface, Product, ProductId, ShopResult};

/// Product service trait.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Lists products. Sellers only ever see their own.
    async fn list_products(&self, actor: &Actor, query: ProductQuery) -> ShopResult<ProductListResponse>;

    /// Gets the owner view of a product.
    async fn get_product(&self, actor: &Actor, id: ProductId) -> ShopResult<Product>;

    /// Creates a product owned by the actor.
    async fn create_product(&self, actor: &Actor, request: CreateProductRequest, image: ImageUpload)
        -> ShopResult<Product>;

    /// Applies a partial update.
    async fn update_product(&self, actor: &Actor, id: ProductId, request: UpdateProductRequest)
        -> ShopResult<Product>;

    /// Deletes a product.
    async fn delete_product(&self, actor: &Actor, id: ProductId) -> ShopResult<()>;

    /// Public product page with seller and reviews.
    async fn get_product_details(&self, id: ProductId) -> ShopResult<ProductDetailsResponse>;

    /// Checks one product's stock and alerts the admin when it is low.
    async fn stock_checkup(&self, actor: &Actor, id: ProductId) -> ShopResult<StockCheckResponse>;

    /// Mails one report of every product with `stock <= threshold`.
    /// Returns how many products were listed; nothing is sent for zero.
    async fn send_low_stock_report(&self, threshold: u32) -> ShopResult<usize>;
}
