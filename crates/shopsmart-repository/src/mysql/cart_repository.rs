//! MySQL cart and wishlist repositories.

use super::parse_id;
use crate::{
    traits::{CartRepository, WishlistRepository},
    DatabasePoolInterface,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopsmart_core::{CartItem, ProductId, ShopResult, UserId, WishlistItem};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, FromRow)]
struct CartRow {
    product_id: String,
    quantity: u32,
    added_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct WishlistRow {
    product_id: String,
    added_at: DateTime<Utc>,
}

/// MySQL cart repository implementation.
#[derive(Clone)]
pub struct MySqlCartRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlCartRepository {
    /// Creates a new MySQL cart repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for MySqlCartRepository {
    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<CartItem>> {
        debug!("Loading cart for user: {}", user_id);

        let rows = sqlx::query_as::<_, CartRow>(
            "SELECT product_id, quantity, added_at FROM cart_items WHERE user_id = ? ORDER BY added_at ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter()
            .map(|row| -> ShopResult<CartItem> {
                Ok(CartItem {
                    product_id: parse_id("cart_items.product_id", &row.product_id)?,
                    quantity: row.quantity,
                    added_at: row.added_at,
                })
            })
            .collect()
    }

    async fn add_one(&self, user_id: UserId, product_id: ProductId) -> ShopResult<()> {
        debug!("Adding product {} to cart of user {}", product_id, user_id);

        sqlx::query(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity, added_at)
            VALUES (?, ?, 1, ?)
            ON DUPLICATE KEY UPDATE quantity = quantity + 1
            ",
        )
        .bind(user_id.to_string())
        .bind(product_id.to_string())
        .bind(Utc::now())
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn remove(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ?")
            .bind(user_id.to_string())
            .bind(product_id.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// MySQL wishlist repository implementation.
#[derive(Clone)]
pub struct MySqlWishlistRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlWishlistRepository {
    /// Creates a new MySQL wishlist repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistRepository for MySqlWishlistRepository {
    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<WishlistItem>> {
        debug!("Loading wishlist for user: {}", user_id);

        let rows = sqlx::query_as::<_, WishlistRow>(
            "SELECT product_id, added_at FROM wishlist_items WHERE user_id = ? ORDER BY added_at ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter()
            .map(|row| -> ShopResult<WishlistItem> {
                Ok(WishlistItem {
                    product_id: parse_id("wishlist_items.product_id", &row.product_id)?,
                    added_at: row.added_at,
                })
            })
            .collect()
    }

    async fn add(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool> {
        let result = sqlx::query("INSERT IGNORE INTO wishlist_items (user_id, product_id, added_at) VALUES (?, ?, ?)")
            .bind(user_id.to_string())
            .bind(product_id.to_string())
            .bind(Utc::now())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool> {
        let result = sqlx::query("DELETE FROM wishlist_items WHERE user_id = ? AND product_id = ?")
            .bind(user_id.to_string())
            .bind(product_id.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlCartRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlCartRepository").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for MySqlWishlistRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlWishlistRepository").finish_non_exhaustive()
    }
}
