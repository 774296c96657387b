//! Product review entity.

use crate::{ProductId, ReviewId, ShopError, ShopResult, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// A rating with feedback. Each user has at most one review per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: u8,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review, rejecting ratings outside `1..=5`.
    pub fn new(product_id: ProductId, user_id: UserId, rating: u8, feedback: String) -> ShopResult<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ShopError::validation(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
        Ok(Self {
            id: ReviewId::new(),
            product_id,
            user_id,
            rating,
            feedback: feedback.trim().to_string(),
            created_at: Utc::now(),
        })
    }
}
