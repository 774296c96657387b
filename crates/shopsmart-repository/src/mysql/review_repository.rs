//! MySQL review repository implementation.

use super::parse_id;
use crate::{traits::ReviewRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopsmart_core::{ProductId, Review, ShopError, ShopResult};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const REVIEW_COLUMNS: &str = "id, product_id, user_id, rating, feedback, created_at";

/// MySQL review repository implementation.
#[derive(Clone)]
pub struct MySqlReviewRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlReviewRepository {
    /// Creates a new MySQL review repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    id: String,
    product_id: String,
    user_id: String,
    rating: u8,
    feedback: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = ShopError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: parse_id("reviews.id", &row.id)?,
            product_id: parse_id("reviews.product_id", &row.product_id)?,
            user_id: parse_id("reviews.user_id", &row.user_id)?,
            rating: row.rating,
            feedback: row.feedback,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ReviewRepository for MySqlReviewRepository {
    async fn find_by_product(&self, product_id: ProductId) -> ShopResult<Vec<Review>> {
        debug!("Loading reviews for product: {}", product_id);

        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(product_id.to_string())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    async fn upsert(&self, review: &Review) -> ShopResult<Review> {
        debug!("Upserting review of product {} by user {}", review.product_id, review.user_id);

        // The existing row keeps its id when the author reviews again
        sqlx::query(
            r"
            INSERT INTO reviews (id, product_id, user_id, rating, feedback, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE rating = VALUES(rating), feedback = VALUES(feedback),
                                    created_at = VALUES(created_at)
            ",
        )
        .bind(review.id.to_string())
        .bind(review.product_id.to_string())
        .bind(review.user_id.to_string())
        .bind(review.rating)
        .bind(&review.feedback)
        .bind(review.created_at)
        .execute(self.pool.inner())
        .await?;

        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE product_id = ? AND user_id = ?"
        ))
        .bind(review.product_id.to_string())
        .bind(review.user_id.to_string())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Review::try_from)
            .transpose()?
            .ok_or_else(|| ShopError::internal("Failed to fetch upserted review"))
    }
}

impl std::fmt::Debug for MySqlReviewRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlReviewRepository").finish_non_exhaustive()
    }
}
