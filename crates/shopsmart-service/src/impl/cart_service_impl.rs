//! Cart and wishlist service implementations.

use crate::cart_service::{CartService, WishlistService};
use crate::dto::{CartLineResponse, CartResponse, WishlistLineResponse, WishlistResponse};
use async_trait::async_trait;
use shopsmart_core::{Actor, Product, ProductId, ShopError, ShopResult, UserRole};
use shopsmart_repository::{CartRepository, ProductRepository, WishlistRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

async fn products_by_id(
    repository: &dyn ProductRepository,
    ids: &[ProductId],
) -> ShopResult<HashMap<ProductId, Product>> {
    Ok(repository
        .find_by_ids(ids)
        .await?
        .into_iter()
        .map(|product| (product.id, product))
        .collect())
}

async fn ensure_product_exists(repository: &dyn ProductRepository, id: ProductId) -> ShopResult<()> {
    repository
        .find_by_id(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ShopError::not_found("Product", id))
}

/// Cart service implementation.
pub struct CartServiceImpl {
    cart_repository: Arc<dyn CartRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl CartServiceImpl {
    pub fn new(cart_repository: Arc<dyn CartRepository>, product_repository: Arc<dyn ProductRepository>) -> Self {
        Self {
            cart_repository,
            product_repository,
        }
    }

    /// Joins cart lines with their products. Lines whose product is gone are dropped.
    async fn populated_cart(&self, actor: &Actor) -> ShopResult<CartResponse> {
        let items = self.cart_repository.find_by_user(actor.user_id).await?;
        let ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
        let mut products = products_by_id(self.product_repository.as_ref(), &ids).await?;

        let lines = items
            .into_iter()
            .filter_map(|item| {
                products.remove(&item.product_id).map(|product| CartLineResponse {
                    line_total: product.total_for(item.quantity),
                    product,
                    quantity: item.quantity,
                    added_at: item.added_at,
                })
            })
            .collect();

        Ok(CartResponse::new(lines))
    }
}

impl std::fmt::Debug for CartServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartServiceImpl").finish_non_exhaustive()
    }
}

#[async_trait]
impl CartService for CartServiceImpl {
    async fn get_cart(&self, actor: &Actor) -> ShopResult<CartResponse> {
        actor.require_any_role(UserRole::SHOPPERS)?;
        self.populated_cart(actor).await
    }

    async fn add_to_cart(&self, actor: &Actor, product_id: ProductId) -> ShopResult<CartResponse> {
        actor.require_any_role(UserRole::SHOPPERS)?;
        ensure_product_exists(self.product_repository.as_ref(), product_id).await?;

        self.cart_repository.add_one(actor.user_id, product_id).await?;
        info!("Product {} added to cart of {}", product_id, actor.user_id);

        self.populated_cart(actor).await
    }

    async fn remove_from_cart(&self, actor: &Actor, product_id: ProductId) -> ShopResult<CartResponse> {
        actor.require_any_role(UserRole::SHOPPERS)?;

        if self.cart_repository.remove(actor.user_id, product_id).await? {
            info!("Product {} removed from cart of {}", product_id, actor.user_id);
        } else {
            debug!("Product {} was not in cart of {}", product_id, actor.user_id);
        }

        self.populated_cart(actor).await
    }
}

/// Wishlist service implementation.
pub struct WishlistServiceImpl {
    wishlist_repository: Arc<dyn WishlistRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl WishlistServiceImpl {
    pub fn new(
        wishlist_repository: Arc<dyn WishlistRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            wishlist_repository,
            product_repository,
        }
    }

    async fn populated_wishlist(&self, actor: &Actor) -> ShopResult<WishlistResponse> {
        let items = self.wishlist_repository.find_by_user(actor.user_id).await?;
        let ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
        let mut products = products_by_id(self.product_repository.as_ref(), &ids).await?;

        let items = items
            .into_iter()
            .filter_map(|item| {
                products.remove(&item.product_id).map(|product| WishlistLineResponse {
                    product,
                    added_at: item.added_at,
                })
            })
            .collect();

        Ok(WishlistResponse { items })
    }
}

impl std::fmt::Debug for WishlistServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistServiceImpl").finish_non_exhaustive()
    }
}

#[async_trait]
impl WishlistService for WishlistServiceImpl {
    async fn get_wishlist(&self, actor: &Actor) -> ShopResult<WishlistResponse> {
        actor.require_any_role(UserRole::SHOPPERS)?;
        self.populated_wishlist(actor).await
    }

    async fn add_to_wishlist(&self, actor: &Actor, product_id: ProductId) -> ShopResult<WishlistResponse> {
        actor.require_any_role(UserRole::SHOPPERS)?;
        ensure_product_exists(self.product_repository.as_ref(), product_id).await?;

        if self.wishlist_repository.add(actor.user_id, product_id).await? {
            info!("Product {} added to wishlist of {}", product_id, actor.user_id);
        } else {
            debug!("Product {} already in wishlist of {}", product_id, actor.user_id);
        }

        self.populated_wishlist(actor).await
    }

    async fn remove_from_wishlist(&self, actor: &Actor, product_id: ProductId) -> ShopResult<WishlistResponse> {
        actor.require_any_role(UserRole::SHOPPERS)?;
        self.wishlist_repository.remove(actor.user_id, product_id).await?;
        self.populated_wishlist(actor).await
    }
}
