//! Order entity.

use crate::{OrderId, OrderStatus, PaymentMode, PaymentStatus, Product, ProductId, ShippingAddress, ShopError, ShopResult, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchase of one product by one user.
///
/// Name and unit price are captured at purchase time so later catalog edits
/// do not rewrite order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub total_amount: Decimal,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub status: OrderStatus,
    pub tracking_id: Option<String>,
    pub shipping_address: Option<ShippingAddress>,
    pub purchased_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a pending order for `quantity` units of `product`.
    pub fn place(
        user_id: UserId,
        product: &Product,
        quantity: u32,
        payment_mode: PaymentMode,
        shipping_address: Option<ShippingAddress>,
    ) -> ShopResult<Self> {
        if quantity == 0 {
            return Err(ShopError::validation("quantity must be at least 1"));
        }
        Ok(Self {
            id: OrderId::new(),
            user_id,
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price: product.price,
            quantity,
            total_amount: product.order_total(quantity)?,
            payment_mode,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            status: OrderStatus::Pending,
            tracking_id: None,
            shipping_address,
            purchased_at: Utc::now(),
            delivered_at: None,
        })
    }

    /// Moves the order to `next`, stamping the delivery time when delivered.
    pub fn transition_to(&mut self, next: OrderStatus, tracking_id: Option<String>) -> ShopResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(ShopError::business_rule(format!(
                "cannot move order from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        if tracking_id.is_some() {
            self.tracking_id = tracking_id;
        }
        if next == OrderStatus::Delivered {
            self.delivered_at = Some(Utc::now());
            if self.payment_mode == PaymentMode::Cod {
                self.payment_status = PaymentStatus::Paid;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewProduct;

    fn product(price: i64) -> Product {
        Product::new(
            UserId::new(),
            NewProduct {
                name: "Kettle".to_string(),
                image_url: "/uploads/k.png".to_string(),
                price: Decimal::from(price),
                company: None,
                category: None,
                stock: Some(10),
                available_colors: vec![],
                available_options: vec![],
            },
        )
    }

    #[test]
    fn test_place_computes_total() {
        let order = Order::place(UserId::new(), &product(25), 4, PaymentMode::Cod, None).unwrap();
        assert_eq!(order.total_amount, Decimal::from(100));
        assert_eq!(order.unit_price, Decimal::from(25));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = Order::place(UserId::new(), &product(25), 0, PaymentMode::Cod, None).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_total_beyond_money_column_rejected() {
        let err = Order::place(UserId::new(), &product(9_000_000_000), 2, PaymentMode::Cod, None).unwrap_err();
        assert!(matches!(err, ShopError::BusinessRule(_)));
    }

    #[test]
    fn test_delivery_stamps_time_and_settles_cod() {
        let mut order = Order::place(UserId::new(), &product(10), 1, PaymentMode::Cod, None).unwrap();
        order.transition_to(OrderStatus::Processing, None).unwrap();
        order.transition_to(OrderStatus::Shipped, Some("TRK-1".to_string())).unwrap();
        order.transition_to(OrderStatus::Delivered, None).unwrap();
        assert!(order.delivered_at.is_some());
        assert_eq!(order.tracking_id.as_deref(), Some("TRK-1"));
        assert_eq!(order.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_illegal_transition_rejected() {
        let mut order = Order::place(UserId::new(), &product(10), 1, PaymentMode::Online, None).unwrap();
        let err = order.transition_to(OrderStatus::Delivered, None).unwrap_err();
        assert!(matches!(err, ShopError::BusinessRule(_)));
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
