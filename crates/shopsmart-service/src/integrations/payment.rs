//! Payment gateway seam.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopsmart_config::PaymentConfig;
use shopsmart_core::{Interface, OrderId, ShopError, ShopResult};
use tracing::info;
use uuid::Uuid;

/// A payment order awaiting capture by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    /// Our order id, echoed back by the gateway.
    pub receipt: String,
}

/// Creates payment orders for online payments.
#[async_trait]
pub trait PaymentGateway: Interface + Send + Sync {
    async fn create_payment_order(&self, amount: Decimal, receipt: OrderId) -> ShopResult<PaymentOrder>;
}

/// Gateway that issues payment ids locally without contacting a provider.
#[derive(Debug, Clone)]
pub struct OfflinePaymentGateway {
    currency: String,
    id_prefix: String,
}

impl OfflinePaymentGateway {
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            id_prefix: config.order_id_prefix.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for OfflinePaymentGateway {
    async fn create_payment_order(&self, amount: Decimal, receipt: OrderId) -> ShopResult<PaymentOrder> {
        if amount <= Decimal::ZERO {
            return Err(ShopError::validation("Payment amount must be positive"));
        }
        let order = PaymentOrder {
            id: format!("{}{}", self.id_prefix, Uuid::new_v4().simple()),
            amount,
            currency: self.currency.clone(),
            receipt: receipt.to_string(),
        };
        info!("Payment order {} created for {} {}", order.id, order.amount, order.currency);
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> OfflinePaymentGateway {
        OfflinePaymentGateway::new(&PaymentConfig {
            currency: "INR".to_string(),
            order_id_prefix: "pay_".to_string(),
        })
    }

    #[tokio::test]
    async fn test_creates_prefixed_payment_order() {
        let receipt = OrderId::new();
        let order = gateway()
            .create_payment_order(Decimal::new(49_900, 2), receipt)
            .await
            .unwrap();
        assert!(order.id.starts_with("pay_"));
        assert_eq!(order.currency, "INR");
        assert_eq!(order.receipt, receipt.to_string());
    }

    #[tokio::test]
    async fn test_rejects_zero_amount() {
        let result = gateway().create_payment_order(Decimal::ZERO, OrderId::new()).await;
        assert!(result.is_err());
    }
}
