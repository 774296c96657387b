//! Order and review service implementations.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{AddReviewRequest, PlaceOrderRequest, ProductDetailsResponse, UpdateOrderStatusRequest};
use crate::integrations::PaymentGateway;
use crate::order_service::{OrderService, ReviewService};
use crate::product_service::ProductService;
use async_trait::async_trait;
use shopsmart_core::{
    Actor, Order, OrderId, OrderStatus, PaymentMode, ProductId, Review, ShopError, ShopResult, UserRole,
    ValidateExt,
};
use shopsmart_repository::{OrderRepository, ProductRepository, ReviewRepository};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Order service implementation.
pub struct OrderServiceImpl {
    order_repository: Arc<dyn OrderRepository>,
    product_repository: Arc<dyn ProductRepository>,
    payment_gateway: Arc<dyn PaymentGateway>,
    cache: Arc<dyn CacheInterface>,
}

impl OrderServiceImpl {
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        product_repository: Arc<dyn ProductRepository>,
        payment_gateway: Arc<dyn PaymentGateway>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            order_repository,
            product_repository,
            payment_gateway,
            cache,
        }
    }
}

impl std::fmt::Debug for OrderServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderServiceImpl").finish_non_exhaustive()
    }
}

#[async_trait]
impl OrderService for OrderServiceImpl {
    async fn place_order(&self, actor: &Actor, request: PlaceOrderRequest) -> ShopResult<Order> {
        actor.require_any_role(UserRole::SHOPPERS)?;
        request.validate_request()?;

        let product = self
            .product_repository
            .find_by_id(request.product_id)
            .await?
            .ok_or_else(|| ShopError::not_found("Product", request.product_id))?;

        let order = Order::place(
            actor.user_id,
            &product,
            request.quantity,
            request.payment_mode,
            request.shipping_address,
        )?;

        // Stock is reserved before the gateway sees the order.
        let mut placed = self.order_repository.place(&order).await?;

        if placed.payment_mode == PaymentMode::Online {
            match self
                .payment_gateway
                .create_payment_order(placed.total_amount, placed.id)
                .await
            {
                Ok(payment) => {
                    placed.payment_id = Some(payment.id);
                    placed = self.order_repository.update(&placed).await?;
                }
                Err(e) => {
                    warn!("Payment order for {} failed, releasing stock: {}", placed.id, e);
                    placed.transition_to(OrderStatus::Cancelled, None)?;
                    self.order_repository.cancel(&placed).await?;
                    self.cache.try_invalidate(&cache_keys::product_write(product.id)).await;
                    return Err(e);
                }
            }
        }

        self.cache.try_invalidate(&cache_keys::product_write(product.id)).await;

        info!(
            "Order {} placed by {}: {} x {}",
            placed.id, actor.user_id, placed.quantity, placed.product_id
        );
        Ok(placed)
    }

    async fn order_history(&self, actor: &Actor) -> ShopResult<Vec<Order>> {
        actor.require_any_role(UserRole::SHOPPERS)?;
        debug!("Order history for {}", actor.user_id);
        self.order_repository.find_by_user(actor.user_id).await
    }

    async fn update_status(
        &self,
        actor: &Actor,
        id: OrderId,
        request: UpdateOrderStatusRequest,
    ) -> ShopResult<Order> {
        actor.require_any_role(UserRole::ADMINS)?;
        request.validate_request()?;

        let mut order = self
            .order_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Order", id))?;

        let previous = order.status;
        order.transition_to(request.status, request.tracking_id)?;
        let updated = if order.status == OrderStatus::Cancelled {
            let cancelled = self.order_repository.cancel(&order).await?;
            self.cache.try_invalidate(&cache_keys::product_write(cancelled.product_id)).await;
            cancelled
        } else {
            self.order_repository.update(&order).await?
        };

        info!("Order {} moved from {} to {}", id, previous, updated.status);
        Ok(updated)
    }
}

/// Review service implementation.
pub struct ReviewServiceImpl {
    review_repository: Arc<dyn ReviewRepository>,
    product_repository: Arc<dyn ProductRepository>,
    product_service: Arc<dyn ProductService>,
    cache: Arc<dyn CacheInterface>,
}

impl ReviewServiceImpl {
    pub fn new(
        review_repository: Arc<dyn ReviewRepository>,
        product_repository: Arc<dyn ProductRepository>,
        product_service: Arc<dyn ProductService>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            review_repository,
            product_repository,
            product_service,
            cache,
        }
    }
}

impl std::fmt::Debug for ReviewServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewServiceImpl").finish_non_exhaustive()
    }
}

#[async_trait]
impl ReviewService for ReviewServiceImpl {
    async fn add_review(
        &self,
        actor: &Actor,
        product_id: ProductId,
        request: AddReviewRequest,
    ) -> ShopResult<ProductDetailsResponse> {
        actor.require_any_role(UserRole::SHOPPERS)?;
        request.validate_request()?;

        if self.product_repository.find_by_id(product_id).await?.is_none() {
            return Err(ShopError::not_found("Product", product_id));
        }

        let review = Review::new(product_id, actor.user_id, request.rating, request.feedback)?;
        self.review_repository.upsert(&review).await?;
        self.cache.try_invalidate(&cache_keys::review_write(product_id)).await;

        info!("Review by {} saved for product {}", actor.user_id, product_id);
        self.product_service.get_product_details(product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ProductQuery;
    use crate::integrations::PaymentOrder;
    use crate::testing::TestContext;
    use rust_decimal::Decimal;
    use shopsmart_core::PaymentStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingGateway {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PaymentGateway for CountingGateway {
        async fn create_payment_order(&self, amount: Decimal, receipt: OrderId) -> ShopResult<PaymentOrder> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(ShopError::external("payment", "gateway unavailable"));
            }
            Ok(PaymentOrder {
                id: format!("pay_test{n}"),
                amount,
                currency: "INR".to_string(),
                receipt: receipt.to_string(),
            })
        }
    }

    fn service_with(ctx: &TestContext, gateway: Arc<CountingGateway>) -> OrderServiceImpl {
        OrderServiceImpl::new(ctx.orders.clone(), ctx.products.clone(), gateway, ctx.cache.clone())
    }

    fn order_request(product_id: ProductId, quantity: u32, payment_mode: PaymentMode) -> PlaceOrderRequest {
        PlaceOrderRequest {
            product_id,
            quantity,
            payment_mode,
            shipping_address: None,
        }
    }

    #[tokio::test]
    async fn test_order_decrements_stock_and_invalidates_caches() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 10);
        let actor = TestContext::actor(&shopper);

        ctx.product_service.list_products(&actor, ProductQuery::default()).await.unwrap();
        ctx.product_service.get_product_details(kettle.id).await.unwrap();
        assert_eq!(ctx.cache.keys().len(), 2);

        let order = ctx
            .order_service
            .place_order(&actor, order_request(kettle.id, 3, PaymentMode::Cod))
            .await
            .unwrap();
        assert_eq!(order.total_amount, Decimal::from(75));
        assert_eq!(order.payment_id, None);
        assert_eq!(ctx.products.stock_of(kettle.id), Some(7));
        assert!(!ctx.cache.contains(&cache_keys::product_details(kettle.id)));
        assert!(ctx.cache.keys().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_stock_fails() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 2);

        let err = ctx
            .order_service
            .place_order(&TestContext::actor(&shopper), order_request(kettle.id, 3, PaymentMode::Cod))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::BusinessRule(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(ctx.products.stock_of(kettle.id), Some(2));
    }

    #[tokio::test]
    async fn test_online_order_gets_payment_id() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 5);

        let order = ctx
            .order_service
            .place_order(&TestContext::actor(&shopper), order_request(kettle.id, 1, PaymentMode::Online))
            .await
            .unwrap();
        assert!(order.payment_id.is_some_and(|id| id.starts_with("pay_")));
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_short_stock_never_reaches_gateway() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 2);
        let gateway = Arc::new(CountingGateway::default());
        let service = service_with(&ctx, gateway.clone());

        let err = service
            .place_order(&TestContext::actor(&shopper), order_request(kettle.id, 3, PaymentMode::Online))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::BusinessRule(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ctx.products.stock_of(kettle.id), Some(2));
    }

    #[tokio::test]
    async fn test_online_payment_id_is_persisted() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 5);
        let gateway = Arc::new(CountingGateway::default());
        let service = service_with(&ctx, gateway.clone());
        let actor = TestContext::actor(&shopper);

        let order = service
            .place_order(&actor, order_request(kettle.id, 2, PaymentMode::Online))
            .await
            .unwrap();
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(order.payment_id.as_deref(), Some("pay_test1"));

        let history = service.order_history(&actor).await.unwrap();
        assert_eq!(history[0].payment_id.as_deref(), Some("pay_test1"));
        assert_eq!(ctx.products.stock_of(kettle.id), Some(3));
    }

    #[tokio::test]
    async fn test_gateway_failure_releases_reserved_stock() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 5);
        let gateway = Arc::new(CountingGateway {
            fail: true,
            ..CountingGateway::default()
        });
        let service = service_with(&ctx, gateway.clone());
        let actor = TestContext::actor(&shopper);

        let err = service
            .place_order(&actor, order_request(kettle.id, 2, PaymentMode::Online))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 502);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.products.stock_of(kettle.id), Some(5));

        let history = service.order_history(&actor).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_returns_units_once() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let admin = ctx.seed_user("Root", "root@example.com", UserRole::Admin);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 5);
        let order = ctx
            .order_service
            .place_order(&TestContext::actor(&shopper), order_request(kettle.id, 3, PaymentMode::Cod))
            .await
            .unwrap();
        assert_eq!(ctx.products.stock_of(kettle.id), Some(2));
        ctx.product_service.get_product_details(kettle.id).await.unwrap();

        let admin = TestContext::actor(&admin);
        let cancel = || UpdateOrderStatusRequest {
            status: OrderStatus::Cancelled,
            tracking_id: None,
        };
        let cancelled = ctx.order_service.update_status(&admin, order.id, cancel()).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(ctx.products.stock_of(kettle.id), Some(5));
        assert!(!ctx.cache.contains(&cache_keys::product_details(kettle.id)));

        let err = ctx.order_service.update_status(&admin, order.id, cancel()).await.unwrap_err();
        assert!(matches!(err, ShopError::BusinessRule(_)));
        assert_eq!(ctx.products.stock_of(kettle.id), Some(5));
    }

    #[tokio::test]
    async fn test_order_history_newest_first() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 5);
        let actor = TestContext::actor(&shopper);

        let first = ctx
            .order_service
            .place_order(&actor, order_request(kettle.id, 1, PaymentMode::Cod))
            .await
            .unwrap();
        let second = ctx
            .order_service
            .place_order(&actor, order_request(kettle.id, 1, PaymentMode::Cod))
            .await
            .unwrap();

        let history = ctx.order_service.order_history(&actor).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].purchased_at >= history[1].purchased_at);
        assert!(history.iter().any(|o| o.id == first.id));
        assert!(history.iter().any(|o| o.id == second.id));
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let admin = ctx.seed_user("Root", "root@example.com", UserRole::Admin);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 5);
        let order = ctx
            .order_service
            .place_order(&TestContext::actor(&shopper), order_request(kettle.id, 1, PaymentMode::Cod))
            .await
            .unwrap();
        let move_to = |status, tracking_id: Option<&str>| UpdateOrderStatusRequest {
            status,
            tracking_id: tracking_id.map(ToString::to_string),
        };

        let err = ctx
            .order_service
            .update_status(&TestContext::actor(&shopper), order.id, move_to(OrderStatus::Processing, None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let admin = TestContext::actor(&admin);
        let err = ctx
            .order_service
            .update_status(&admin, order.id, move_to(OrderStatus::Delivered, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::BusinessRule(_)));

        ctx.order_service
            .update_status(&admin, order.id, move_to(OrderStatus::Processing, None))
            .await
            .unwrap();
        ctx.order_service
            .update_status(&admin, order.id, move_to(OrderStatus::Shipped, Some("TRK-9")))
            .await
            .unwrap();
        let delivered = ctx
            .order_service
            .update_status(&admin, order.id, move_to(OrderStatus::Delivered, None))
            .await
            .unwrap();
        assert_eq!(delivered.tracking_id.as_deref(), Some("TRK-9"));
        assert!(delivered.delivered_at.is_some());
        assert_eq!(delivered.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_review_upserts_and_refreshes_details() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let kettle = ctx.seed_product(seller.id, "Kettle", 25, 5);
        let actor = TestContext::actor(&shopper);

        let before = ctx.product_service.get_product_details(kettle.id).await.unwrap();
        assert_eq!(before.review_count, 0);

        let details = ctx
            .review_service
            .add_review(
                &actor,
                kettle.id,
                AddReviewRequest {
                    rating: 4,
                    feedback: "Boils fast".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(details.review_count, 1);
        assert_eq!(details.reviews[0].author.as_ref().map(|a| a.name.as_str()), Some("Asha"));

        let details = ctx
            .review_service
            .add_review(
                &actor,
                kettle.id,
                AddReviewRequest {
                    rating: 2,
                    feedback: "Leaks".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(details.review_count, 1);
        assert_eq!(details.average_rating, Some(2.0));
    }

    #[tokio::test]
    async fn test_review_of_missing_product() {
        let ctx = TestContext::new();
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let err = ctx
            .review_service
            .add_review(
                &TestContext::actor(&shopper),
                ProductId::new(),
                AddReviewRequest {
                    rating: 5,
                    feedback: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
