//! Product service implementation.
//!
//! Every cached read checks the caller's permissions on the value it is
//! about to return, whether it came from the cache or from the repository.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{
    CreateProductRequest, ImageUpload, OwnerSummary, ProductDetailsResponse, ProductListResponse, ProductQuery,
    ReviewResponse, ReviewerSummary, StockCheckResponse, StockStatus, UpdateProductRequest,
};
use crate::integrations::{ImageStorage, MailMessage, Mailer};
use crate::product_service::ProductService;
use async_trait::async_trait;
use chrono::Utc;
use shopsmart_config::{CacheConfig, MailConfig};
use shopsmart_core::{
    Actor, NewProduct, Product, ProductId, ShopError, ShopResult, UserId, UserRole, ValidateExt,
    LOW_STOCK_THRESHOLD,
};
use shopsmart_repository::{ProductRepository, ReviewRepository, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Product service implementation.
pub struct ProductServiceImpl {
    product_repository: Arc<dyn ProductRepository>,
    user_repository: Arc<dyn UserRepository>,
    review_repository: Arc<dyn ReviewRepository>,
    cache: Arc<dyn CacheInterface>,
    image_storage: Arc<dyn ImageStorage>,
    mailer: Arc<dyn Mailer>,
    cache_config: Arc<CacheConfig>,
    mail_config: Arc<MailConfig>,
}

impl ProductServiceImpl {
    /// Creates a new product service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        user_repository: Arc<dyn UserRepository>,
        review_repository: Arc<dyn ReviewRepository>,
        cache: Arc<dyn CacheInterface>,
        image_storage: Arc<dyn ImageStorage>,
        mailer: Arc<dyn Mailer>,
        cache_config: Arc<CacheConfig>,
        mail_config: Arc<MailConfig>,
    ) -> Self {
        Self {
            product_repository,
            user_repository,
            review_repository,
            cache,
            image_storage,
            mailer,
            cache_config,
            mail_config,
        }
    }

    /// Cache-aside read of the owner view, without authorization.
    async fn load_product(&self, id: ProductId) -> ShopResult<Product> {
        let key = cache_keys::product(id);
        if let Some(product) = self.cache.try_get::<Product>(&key).await {
            debug!("Cache hit for product: {}", id);
            return Ok(product);
        }

        debug!("Cache miss for product: {}", id);
        let product = self
            .product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Product", id))?;

        self.cache.try_set(&key, &product, self.cache_config.product_ttl()).await;
        Ok(product)
    }

    /// Loads a product straight from the repository and checks the actor may modify it.
    async fn find_owned(&self, actor: &Actor, id: ProductId) -> ShopResult<Product> {
        actor.require_any_role(UserRole::MERCHANTS)?;
        let product = self
            .product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Product", id))?;
        actor.require_owner_or_admin(product.owner_id)?;
        Ok(product)
    }

    async fn build_details(&self, product: Product) -> ShopResult<ProductDetailsResponse> {
        let owner = self
            .user_repository
            .find_by_id(product.owner_id)
            .await?
            .as_ref()
            .map(OwnerSummary::from);

        let reviews = self.review_repository.find_by_product(product.id).await?;
        let author_ids: Vec<UserId> = reviews.iter().map(|r| r.user_id).collect();
        let authors: HashMap<UserId, ReviewerSummary> = self
            .user_repository
            .find_by_ids(&author_ids)
            .await?
            .iter()
            .map(|user| (user.id, ReviewerSummary::from(user)))
            .collect();

        let reviews = reviews
            .into_iter()
            .map(|review| {
                let author = authors.get(&review.user_id).cloned();
                ReviewResponse::new(review, author)
            })
            .collect();

        Ok(ProductDetailsResponse::new(product, owner, reviews))
    }
}

impl std::fmt::Debug for ProductServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceImpl")
            .field("cache_enabled", &self.cache.is_enabled())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn list_products(&self, actor: &Actor, query: ProductQuery) -> ShopResult<ProductListResponse> {
        actor.require_any_role(UserRole::ANY)?;

        let page = query.page_request();
        let mut filter = query.to_filter();
        if actor.role == UserRole::Seller {
            filter.owner_id = Some(actor.user_id);
        }

        if filter.has_user_filters() {
            debug!("Filtered product listing, bypassing cache");
            let products = self.product_repository.search(&filter, page).await?;
            return Ok(ProductListResponse::from(products));
        }

        let key = match filter.owner_id {
            Some(seller) => cache_keys::products_by_seller(seller, page),
            None => cache_keys::products_all(page),
        };
        if let Some(list) = self.cache.try_get::<ProductListResponse>(&key).await {
            debug!("Cache hit for product list: {}", key);
            return Ok(list);
        }

        let products = self.product_repository.search(&filter, page).await?;
        let list = ProductListResponse::from(products);
        self.cache.try_set(&key, &list, self.cache_config.list_ttl()).await;
        Ok(list)
    }

    async fn get_product(&self, actor: &Actor, id: ProductId) -> ShopResult<Product> {
        actor.require_any_role(UserRole::MERCHANTS)?;
        let product = self.load_product(id).await?;
        actor.require_owner_or_admin(product.owner_id)?;
        Ok(product)
    }

    async fn create_product(
        &self,
        actor: &Actor,
        request: CreateProductRequest,
        image: ImageUpload,
    ) -> ShopResult<Product> {
        actor.require_any_role(UserRole::MERCHANTS)?;
        request.validate_request()?;

        let image_url = self.image_storage.store(image).await?;
        let product = Product::new(
            actor.user_id,
            NewProduct {
                name: request.name,
                image_url,
                price: request.price,
                company: request.company,
                category: request.category,
                stock: request.stock,
                available_colors: request.available_colors,
                available_options: request.available_options,
            },
        );

        let saved = match self.product_repository.save(&product).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Err(cleanup) = self.image_storage.remove(&product.image_url).await {
                    warn!("Failed to remove image {} of unsaved product: {}", product.image_url, cleanup);
                }
                return Err(e);
            }
        };
        self.cache.try_invalidate(&cache_keys::product_write(saved.id)).await;

        info!("Product created: {} by {}", saved.id, actor.user_id);
        Ok(saved)
    }

    async fn update_product(
        &self,
        actor: &Actor,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> ShopResult<Product> {
        request.validate_request()?;
        let mut product = self.find_owned(actor, id).await?;

        if let Some(name) = request.name {
            product.name = name.trim().to_string();
        }
        if let Some(price) = request.price {
            product.price = price;
        }
        if let Some(company) = request.company {
            product.company = Some(company);
        }
        if let Some(category) = request.category {
            product.category = category.trim().to_string();
        }
        if let Some(image_url) = request.image_url {
            product.image_url = image_url;
        }
        if let Some(colors) = request.available_colors {
            product.available_colors = colors;
        }
        if let Some(options) = request.available_options {
            product.available_options = options;
        }
        product.updated_at = Utc::now();

        if let Some(stock) = request.stock {
            self.product_repository.set_stock(id, stock).await?;
        }
        let updated = self.product_repository.update(&product).await?;
        self.cache.try_invalidate(&cache_keys::product_write(id)).await;

        info!("Product updated: {}", id);
        Ok(updated)
    }

    async fn delete_product(&self, actor: &Actor, id: ProductId) -> ShopResult<()> {
        self.find_owned(actor, id).await?;

        if !self.product_repository.delete(id).await? {
            return Err(ShopError::not_found("Product", id));
        }
        self.cache.try_invalidate(&cache_keys::product_write(id)).await;

        info!("Product deleted: {}", id);
        Ok(())
    }

    async fn get_product_details(&self, id: ProductId) -> ShopResult<ProductDetailsResponse> {
        let key = cache_keys::product_details(id);
        if let Some(details) = self.cache.try_get::<ProductDetailsResponse>(&key).await {
            debug!("Cache hit for product details: {}", id);
            return Ok(details);
        }

        let product = self
            .product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShopError::not_found("Product", id))?;

        let details = self.build_details(product).await?;
        self.cache.try_set(&key, &details, self.cache_config.product_ttl()).await;
        Ok(details)
    }

    async fn stock_checkup(&self, actor: &Actor, id: ProductId) -> ShopResult<StockCheckResponse> {
        let product = self.find_owned(actor, id).await?;

        if !product.is_low_stock(LOW_STOCK_THRESHOLD) {
            return Ok(StockCheckResponse::new(&product, StockStatus::Sufficient));
        }

        warn!("Low stock for product {}: {} left", product.id, product.stock);
        self.mailer
            .send(MailMessage::low_stock_alert(&self.mail_config.admin_address, &product))
            .await?;
        Ok(StockCheckResponse::new(&product, StockStatus::AlertSent))
    }

    async fn send_low_stock_report(&self, threshold: u32) -> ShopResult<usize> {
        let products = self.product_repository.find_low_stock(threshold).await?;
        if products.is_empty() {
            info!("No products at or below stock {}", threshold);
            return Ok(0);
        }

        self.mailer
            .send(MailMessage::low_stock_report(&self.mail_config.admin_address, &products))
            .await?;

        info!("Low stock report sent for {} product(s)", products.len());
        Ok(products.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryCache, InMemoryOrderRepository, InMemoryProductRepository, TestContext};
    use parking_lot::Mutex;
    use rust_decimal::Decimal;
    use shopsmart_core::{Order, Page, PageRequest, PaymentMode, ProductFilter};
    use shopsmart_repository::OrderRepository;

    /// Product repository that can place another shopper's order right after
    /// a read, or refuse inserts.
    struct ScriptedProducts {
        inner: Arc<InMemoryProductRepository>,
        orders: Arc<InMemoryOrderRepository>,
        order_after_read: Mutex<Option<Order>>,
        fail_saves: bool,
    }

    impl ScriptedProducts {
        fn new(ctx: &TestContext) -> Self {
            Self {
                inner: ctx.products.clone(),
                orders: ctx.orders.clone(),
                order_after_read: Mutex::new(None),
                fail_saves: false,
            }
        }
    }

    #[async_trait]
    impl ProductRepository for ScriptedProducts {
        async fn find_by_id(&self, id: ProductId) -> ShopResult<Option<Product>> {
            let found = self.inner.find_by_id(id).await?;
            let order = self.order_after_read.lock().take();
            if let Some(order) = order {
                self.orders.place(&order).await?;
            }
            Ok(found)
        }

        async fn find_by_ids(&self, ids: &[ProductId]) -> ShopResult<Vec<Product>> {
            self.inner.find_by_ids(ids).await
        }

        async fn search(&self, filter: &ProductFilter, page: PageRequest) -> ShopResult<Page<Product>> {
            self.inner.search(filter, page).await
        }

        async fn find_low_stock(&self, threshold: u32) -> ShopResult<Vec<Product>> {
            self.inner.find_low_stock(threshold).await
        }

        async fn save(&self, product: &Product) -> ShopResult<Product> {
            if self.fail_saves {
                return Err(ShopError::Database("insert refused".to_string()));
            }
            self.inner.save(product).await
        }

        async fn update(&self, product: &Product) -> ShopResult<Product> {
            self.inner.update(product).await
        }

        async fn set_stock(&self, id: ProductId, stock: u32) -> ShopResult<bool> {
            self.inner.set_stock(id, stock).await
        }

        async fn delete(&self, id: ProductId) -> ShopResult<bool> {
            self.inner.delete(id).await
        }
    }

    fn service_over(ctx: &TestContext, products: Arc<dyn ProductRepository>) -> ProductServiceImpl {
        ProductServiceImpl::new(
            products,
            ctx.users.clone(),
            ctx.reviews.clone(),
            ctx.cache.clone(),
            ctx.images.clone(),
            ctx.mailer.clone(),
            Arc::new(CacheConfig::default()),
            ctx.mail_config.clone(),
        )
    }

    fn image() -> ImageUpload {
        ImageUpload {
            file_name: "kettle.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    fn create_request(name: &str) -> CreateProductRequest {
        CreateProductRequest {
            name: name.to_string(),
            price: Decimal::new(2_499, 2),
            company: Some("Acme".to_string()),
            category: None,
            stock: Some(8),
            available_colors: vec!["red".to_string()],
            available_options: vec![],
        }
    }

    #[tokio::test]
    async fn test_second_unfiltered_list_is_served_from_cache() {
        let ctx = TestContext::new();
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        ctx.seed_product(seller.id, "Kettle", 25, 10);
        let actor = TestContext::actor(&shopper);

        let first = ctx.product_service.list_products(&actor, ProductQuery::default()).await.unwrap();
        assert_eq!(ctx.cache.misses(), 1);
        assert_eq!(ctx.cache.sets(), 1);

        // A product added behind the service's back is invisible until invalidation.
        ctx.seed_product(seller.id, "Toaster", 40, 3);
        let second = ctx.product_service.list_products(&actor, ProductQuery::default()).await.unwrap();
        assert_eq!(ctx.cache.hits(), 1);
        assert_eq!(second.total_elements, first.total_elements);
        assert_eq!(second.total_elements, 1);
    }

    #[tokio::test]
    async fn test_pages_do_not_alias() {
        let ctx = TestContext::new();
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        for (i, price) in [10, 20, 30].into_iter().enumerate() {
            ctx.seed_product(seller.id, &format!("Item {i}"), price, 5);
        }
        let actor = TestContext::actor(&shopper);
        let page = |n| ProductQuery {
            page: Some(n),
            limit: Some(2),
            ..ProductQuery::default()
        };

        let first = ctx.product_service.list_products(&actor, page(1)).await.unwrap();
        let second = ctx.product_service.list_products(&actor, page(2)).await.unwrap();
        assert_eq!(first.products.len(), 2);
        assert_eq!(second.products.len(), 1);
        assert!(ctx.cache.contains(&cache_keys::products_all(PageRequest::new(1, 2))));
        assert!(ctx.cache.contains(&cache_keys::products_all(PageRequest::new(2, 2))));
    }

    #[tokio::test]
    async fn test_filtered_list_never_touches_cache() {
        let ctx = TestContext::new();
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        ctx.seed_product(seller.id, "Desk Lamp", 25, 10);
        ctx.seed_product(seller.id, "Kettle", 30, 10);
        let query = ProductQuery {
            name: Some("lamp".to_string()),
            ..ProductQuery::default()
        };

        let list = ctx
            .product_service
            .list_products(&TestContext::actor(&shopper), query)
            .await
            .unwrap();
        assert_eq!(list.products.len(), 1);
        assert_eq!(ctx.cache.hits() + ctx.cache.misses() + ctx.cache.sets(), 0);
    }

    #[tokio::test]
    async fn test_seller_lists_only_own_products() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let rival = ctx.seed_user("Mira", "mira@example.com", UserRole::Seller);
        ctx.seed_product(seller.id, "Kettle", 25, 10);
        ctx.seed_product(rival.id, "Toaster", 40, 10);

        let list = ctx
            .product_service
            .list_products(&TestContext::actor(&seller), ProductQuery::default())
            .await
            .unwrap();
        assert_eq!(list.products.len(), 1);
        assert_eq!(list.products[0].owner_id, seller.id);
        assert!(ctx
            .cache
            .contains(&cache_keys::products_by_seller(seller.id, PageRequest::new(1, 10))));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_read_cached_product() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let rival = ctx.seed_user("Mira", "mira@example.com", UserRole::Seller);
        let product = ctx.seed_product(owner.id, "Kettle", 25, 10);

        ctx.product_service
            .get_product(&TestContext::actor(&owner), product.id)
            .await
            .unwrap();
        assert!(ctx.cache.contains(&cache_keys::product(product.id)));

        let err = ctx
            .product_service
            .get_product(&TestContext::actor(&rival), product.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(ctx.cache.hits(), 1);
    }

    #[tokio::test]
    async fn test_shopper_cannot_read_owner_view() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let product = ctx.seed_product(owner.id, "Kettle", 25, 10);

        let err = ctx
            .product_service
            .get_product(&TestContext::actor(&shopper), product.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_failing_cache_does_not_fail_reads() {
        let ctx = TestContext::with_cache(Arc::new(InMemoryCache::failing()));
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let product = ctx.seed_product(owner.id, "Kettle", 25, 10);
        let actor = TestContext::actor(&owner);

        let fetched = ctx.product_service.get_product(&actor, product.id).await.unwrap();
        assert_eq!(fetched.id, product.id);
        let list = ctx.product_service.list_products(&actor, ProductQuery::default()).await.unwrap();
        assert_eq!(list.products.len(), 1);
        ctx.product_service.get_product_details(product.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_invalidates_item_and_lists() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let product = ctx.seed_product(owner.id, "Kettle", 25, 10);
        let actor = TestContext::actor(&owner);

        ctx.product_service.get_product(&actor, product.id).await.unwrap();
        ctx.product_service.get_product_details(product.id).await.unwrap();
        ctx.product_service
            .list_products(&TestContext::actor(&shopper), ProductQuery::default())
            .await
            .unwrap();
        ctx.product_service.list_products(&actor, ProductQuery::default()).await.unwrap();
        assert_eq!(ctx.cache.keys().len(), 4);

        let request = UpdateProductRequest {
            price: Some(Decimal::from(30)),
            ..UpdateProductRequest::default()
        };
        let updated = ctx.product_service.update_product(&actor, product.id, request).await.unwrap();
        assert_eq!(updated.price, Decimal::from(30));
        assert!(ctx.cache.keys().is_empty());

        let fresh = ctx.product_service.get_product(&actor, product.id).await.unwrap();
        assert_eq!(fresh.price, Decimal::from(30));
    }

    #[tokio::test]
    async fn test_catalog_edit_keeps_units_sold_meanwhile() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let product = ctx.seed_product(owner.id, "Kettle", 25, 10);

        let products = ScriptedProducts::new(&ctx);
        *products.order_after_read.lock() =
            Some(Order::place(shopper.id, &product, 4, PaymentMode::Cod, None).unwrap());
        let service = service_over(&ctx, Arc::new(products));

        let request = UpdateProductRequest {
            price: Some(Decimal::from(30)),
            ..UpdateProductRequest::default()
        };
        let updated = service
            .update_product(&TestContext::actor(&owner), product.id, request)
            .await
            .unwrap();
        assert_eq!(updated.price, Decimal::from(30));
        assert_eq!(updated.stock, 6);
        assert_eq!(ctx.products.stock_of(product.id), Some(6));
    }

    #[tokio::test]
    async fn test_explicit_stock_is_written() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let product = ctx.seed_product(owner.id, "Kettle", 25, 10);

        let request = UpdateProductRequest {
            stock: Some(3),
            ..UpdateProductRequest::default()
        };
        let updated = ctx
            .product_service
            .update_product(&TestContext::actor(&owner), product.id, request)
            .await
            .unwrap();
        assert_eq!(updated.stock, 3);
        assert_eq!(ctx.products.stock_of(product.id), Some(3));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_uploaded_image() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let products = ScriptedProducts {
            fail_saves: true,
            ..ScriptedProducts::new(&ctx)
        };
        let service = service_over(&ctx, Arc::new(products));

        let err = service
            .create_product(&TestContext::actor(&seller), create_request("Kettle"), image())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(ctx.images.stored_count(), 0);
    }

    #[tokio::test]
    async fn test_create_stores_image_and_applies_defaults() {
        let ctx = TestContext::new();
        let seller = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);

        let product = ctx
            .product_service
            .create_product(&TestContext::actor(&seller), create_request("Kettle"), image())
            .await
            .unwrap();
        assert_eq!(product.owner_id, seller.id);
        assert_eq!(product.category, shopsmart_core::DEFAULT_CATEGORY);
        assert_eq!(product.image_url, "/uploads/kettle.png");
        assert_eq!(ctx.images.stored_count(), 1);
    }

    #[tokio::test]
    async fn test_shopper_cannot_create_product() {
        let ctx = TestContext::new();
        let shopper = ctx.seed_user("Asha", "asha@example.com", UserRole::User);
        let err = ctx
            .product_service
            .create_product(&TestContext::actor(&shopper), create_request("Kettle"), image())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(ctx.images.stored_count(), 0);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let rival = ctx.seed_user("Mira", "mira@example.com", UserRole::Seller);
        let admin = ctx.seed_user("Root", "root@example.com", UserRole::Admin);
        let product = ctx.seed_product(owner.id, "Kettle", 25, 10);

        let err = ctx
            .product_service
            .delete_product(&TestContext::actor(&rival), product.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        ctx.product_service
            .delete_product(&TestContext::actor(&admin), product.id)
            .await
            .unwrap();
        let err = ctx
            .product_service
            .delete_product(&TestContext::actor(&admin), product.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_details_include_owner() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let product = ctx.seed_product(owner.id, "Kettle", 25, 10);

        let details = ctx.product_service.get_product_details(product.id).await.unwrap();
        assert_eq!(details.owner.map(|o| o.email), Some("ravi@example.com".to_string()));
        assert_eq!(details.review_count, 0);
        assert!(ctx.cache.contains(&cache_keys::product_details(product.id)));
    }

    #[tokio::test]
    async fn test_stock_checkup_alerts_when_low() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        let low = ctx.seed_product(owner.id, "Kettle", 25, 5);
        let plenty = ctx.seed_product(owner.id, "Toaster", 40, 6);
        let actor = TestContext::actor(&owner);

        let report = ctx.product_service.stock_checkup(&actor, low.id).await.unwrap();
        assert_eq!(report.status, StockStatus::AlertSent);
        let report = ctx.product_service.stock_checkup(&actor, plenty.id).await.unwrap();
        assert_eq!(report.status, StockStatus::Sufficient);

        let sent = ctx.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Stock low alert");
        assert_eq!(sent[0].to, ctx.mail_config.admin_address);
    }

    #[tokio::test]
    async fn test_low_stock_report() {
        let ctx = TestContext::new();
        assert_eq!(ctx.product_service.send_low_stock_report(5).await.unwrap(), 0);
        assert!(ctx.mailer.sent().is_empty());

        let owner = ctx.seed_user("Ravi", "ravi@example.com", UserRole::Seller);
        ctx.seed_product(owner.id, "Kettle", 25, 0);
        ctx.seed_product(owner.id, "Toaster", 40, 4);
        ctx.seed_product(owner.id, "Blender", 60, 50);

        assert_eq!(ctx.product_service.send_low_stock_report(5).await.unwrap(), 2);
        let sent = ctx.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Kettle"));
        assert!(!sent[0].body.contains("Blender"));
    }
}
