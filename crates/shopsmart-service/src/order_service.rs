//! Order and review service traits.

use crate::dto::{AddReviewRequest, PlaceOrderRequest, ProductDetailsResponse, UpdateOrderStatusRequest};
use async_trait::async_trait;
use shopsmart_core::{Actor, Interface, Order, OrderId, ProductId, ShopResult};

/// Order service trait.
#[async_trait]
pub trait OrderService: Interface + Send + Sync {
    /// Places an order, reserving stock.
    async fn place_order(&self, actor: &Actor, request: PlaceOrderRequest) -> ShopResult<Order>;

    /// The actor's orders, newest first.
    async fn order_history(&self, actor: &Actor) -> ShopResult<Vec<Order>>;

    /// Moves an order to a new status. Admin only.
    async fn update_status(&self, actor: &Actor, id: OrderId, request: UpdateOrderStatusRequest)
        -> ShopResult<Order>;
}

/// Review service trait.
#[async_trait]
pub trait ReviewService: Interface + Send + Sync {
    /// Adds or replaces the actor's review and returns the refreshed product page.
    async fn add_review(&self, actor: &Actor, product_id: ProductId, request: AddReviewRequest)
        -> ShopResult<ProductDetailsResponse>;
}
