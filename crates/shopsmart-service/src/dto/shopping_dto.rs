//! Cart, wishlist, order and review DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopsmart_core::{OrderStatus, PaymentMode, Product, ProductId, ShippingAddress};
use utoipa::ToSchema;
use validator::Validate;

/// A cart line with its product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLineResponse {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Decimal,
    pub added_at: DateTime<Utc>,
}

/// The caller's cart.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    /// Sum of all quantities.
    pub item_count: u32,
    pub subtotal: Decimal,
}

impl CartResponse {
    #[must_use]
    pub fn new(items: Vec<CartLineResponse>) -> Self {
        let item_count = items.iter().map(|line| line.quantity).sum();
        let subtotal = items.iter().map(|line| line.line_total).sum();
        Self {
            items,
            item_count,
            subtotal,
        }
    }
}

/// A wishlist entry with its product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WishlistLineResponse {
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// The caller's wishlist.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WishlistResponse {
    pub items: Vec<WishlistLineResponse>,
}

fn default_quantity() -> u32 {
    1
}

/// Order placement request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    pub product_id: ProductId,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: u32,

    #[serde(default)]
    pub payment_mode: PaymentMode,

    #[validate(nested)]
    pub shipping_address: Option<ShippingAddress>,
}

/// Admin order status change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,

    #[validate(length(min = 1, max = 64, message = "Tracking id must be 1-64 characters"))]
    pub tracking_id: Option<String>,
}

/// Rating and feedback for a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Feedback cannot exceed 2000 characters"))]
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_order_defaults() {
        let id = ProductId::new();
        let request: PlaceOrderRequest =
            serde_json::from_value(serde_json::json!({ "product_id": id.to_string() })).unwrap();
        assert_eq!(request.quantity, 1);
        assert_eq!(request.payment_mode, PaymentMode::Cod);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_place_order_rejects_zero_quantity() {
        let request = PlaceOrderRequest {
            product_id: ProductId::new(),
            quantity: 0,
            payment_mode: PaymentMode::Online,
            shipping_address: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_review_rating_range() {
        let request = AddReviewRequest {
            rating: 6,
            feedback: "Too good".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
