//! Cart and wishlist service traits.

use crate::dto::{CartResponse, WishlistResponse};
use async_trait::async_trait;
use shopsmart_core::{Actor, Interface, ProductId, ShopResult};

/// Cart service trait.
#[async_trait]
pub trait CartService: Interface + Send + Sync {
    async fn get_cart(&self, actor: &Actor) -> ShopResult<CartResponse>;

    /// Adds one unit of the product.
    async fn add_to_cart(&self, actor: &Actor, product_id: ProductId) -> ShopResult<CartResponse>;

    /// Removes the product's line. Removing an absent line is not an error.
    async fn remove_from_cart(&self, actor: &Actor, product_id: ProductId) -> ShopResult<CartResponse>;
}

/// Wishlist service trait.
#[async_trait]
pub trait WishlistService: Interface + Send + Sync {
    async fn get_wishlist(&self, actor: &Actor) -> ShopResult<WishlistResponse>;

    /// Adds the product. Adding it twice keeps a single entry.
    async fn add_to_wishlist(&self, actor: &Actor, product_id: ProductId) -> ShopResult<WishlistResponse>;

    async fn remove_from_wishlist(&self, actor: &Actor, product_id: ProductId) -> ShopResult<WishlistResponse>;
}
