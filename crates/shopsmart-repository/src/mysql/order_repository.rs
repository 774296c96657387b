//! MySQL order repository implementation.

use super::{parse_enum, parse_id};
use crate::{traits::OrderRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopsmart_core::{Order, OrderId, OrderStatus, ShippingAddress, ShopError, ShopResult, UserId};
use sqlx::types::Json;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info};

const ORDER_COLUMNS: &str = "id, user_id, product_id, product_name, unit_price, quantity, total_amount, \
                             payment_mode, payment_status, payment_id, status, tracking_id, \
                             shipping_address, purchased_at, delivered_at";

/// MySQL order repository implementation.
#[derive(Clone)]
pub struct MySqlOrderRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlOrderRepository {
    /// Creates a new MySQL order repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    product_id: String,
    product_name: String,
    unit_price: Decimal,
    quantity: u32,
    total_amount: Decimal,
    payment_mode: String,
    payment_status: String,
    payment_id: Option<String>,
    status: String,
    tracking_id: Option<String>,
    shipping_address: Option<Json<ShippingAddress>>,
    purchased_at: DateTime<Utc>,
    delivered_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRow> for Order {
    type Error = ShopError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: parse_id("orders.id", &row.id)?,
            user_id: parse_id("orders.user_id", &row.user_id)?,
            product_id: parse_id("orders.product_id", &row.product_id)?,
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
            total_amount: row.total_amount,
            payment_mode: parse_enum("orders.payment_mode", &row.payment_mode)?,
            payment_status: parse_enum("orders.payment_status", &row.payment_status)?,
            payment_id: row.payment_id,
            status: parse_enum("orders.status", &row.status)?,
            tracking_id: row.tracking_id,
            shipping_address: row.shipping_address.map(|json| json.0),
            purchased_at: row.purchased_at,
            delivered_at: row.delivered_at,
        })
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn place(&self, order: &Order) -> ShopResult<Order> {
        debug!("Placing order {} for product {}", order.id, order.product_id);

        let mut tx = self.pool.inner().begin().await?;

        let reserved = sqlx::query("UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?")
            .bind(order.quantity)
            .bind(order.product_id.to_string())
            .bind(order.quantity)
            .execute(&mut *tx)
            .await?;

        if reserved.rows_affected() == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?")
                .bind(order.product_id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;

            return Err(match exists {
                Some(_) => ShopError::business_rule(format!(
                    "Insufficient stock for '{}': requested {}",
                    order.product_name, order.quantity
                )),
                None => ShopError::not_found("Product", order.product_id),
            });
        }

        sqlx::query(
            r"
            INSERT INTO orders (id, user_id, product_id, product_name, unit_price, quantity, total_amount,
                                payment_mode, payment_status, payment_id, status, tracking_id,
                                shipping_address, purchased_at, delivered_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(order.id.to_string())
        .bind(order.user_id.to_string())
        .bind(order.product_id.to_string())
        .bind(&order.product_name)
        .bind(order.unit_price)
        .bind(order.quantity)
        .bind(order.total_amount)
        .bind(order.payment_mode.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.payment_id)
        .bind(order.status.as_str())
        .bind(&order.tracking_id)
        .bind(order.shipping_address.as_ref().map(Json))
        .bind(order.purchased_at)
        .bind(order.delivered_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Order {} placed, {} unit(s) reserved", order.id, order.quantity);

        self.find_by_id(order.id)
            .await?
            .ok_or_else(|| ShopError::internal("Failed to fetch inserted order"))
    }

    async fn find_by_id(&self, id: OrderId) -> ShopResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(Order::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<Order>> {
        debug!("Loading orders for user: {}", user_id);

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? ORDER BY purchased_at DESC, id DESC"
        ))
        .bind(user_id.to_string())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn update(&self, order: &Order) -> ShopResult<Order> {
        debug!("Updating order {} to status {}", order.id, order.status);

        sqlx::query(
            r"
            UPDATE orders
            SET status = ?, tracking_id = ?, payment_status = ?, payment_id = ?, delivered_at = ?
            WHERE id = ?
            ",
        )
        .bind(order.status.as_str())
        .bind(&order.tracking_id)
        .bind(order.payment_status.as_str())
        .bind(&order.payment_id)
        .bind(order.delivered_at)
        .bind(order.id.to_string())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(order.id)
            .await?
            .ok_or_else(|| ShopError::not_found("Order", order.id))
    }

    async fn cancel(&self, order: &Order) -> ShopResult<Order> {
        debug!("Cancelling order {}", order.id);

        let mut tx = self.pool.inner().begin().await?;

        let cancelled = sqlx::query(
            r"
            UPDATE orders
            SET status = ?, tracking_id = ?, payment_status = ?, payment_id = ?
            WHERE id = ? AND status <> ?
            ",
        )
        .bind(OrderStatus::Cancelled.as_str())
        .bind(&order.tracking_id)
        .bind(order.payment_status.as_str())
        .bind(&order.payment_id)
        .bind(order.id.to_string())
        .bind(OrderStatus::Cancelled.as_str())
        .execute(&mut *tx)
        .await?;

        if cancelled.rows_affected() > 0 {
            sqlx::query("UPDATE products SET stock = stock + ?, updated_at = ? WHERE id = ?")
                .bind(order.quantity)
                .bind(Utc::now())
                .bind(order.product_id.to_string())
                .execute(&mut *tx)
                .await?;
            info!("Order {} cancelled, {} unit(s) released", order.id, order.quantity);
        }

        tx.commit().await?;

        self.find_by_id(order.id)
            .await?
            .ok_or_else(|| ShopError::not_found("Order", order.id))
    }
}

impl std::fmt::Debug for MySqlOrderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlOrderRepository").finish_non_exhaustive()
    }
}
