//! Dependency wiring.
//!
//! Infrastructure is connected first (MySQL pool, Redis cache). The
//! [`AppModuleBuilder`] then layers the repositories, integrations and
//! services on top and hands back an [`AppModule`] with every service behind
//! its trait object.

use shopsmart_config::{AppConfig, RedisConfig};
use shopsmart_core::{HealthCheck, ShopError, ShopResult};
use shopsmart_repository::{
    CartRepository, DatabasePool, DatabasePoolInterface, MySqlCartRepository, MySqlOrderRepository,
    MySqlProductRepository, MySqlReviewRepository, MySqlUserRepository, MySqlWishlistRepository, OrderRepository,
    ProductRepository, ReviewRepository, UserRepository, WishlistRepository,
};
use shopsmart_rest::AppState;
use shopsmart_security::{PasswordHasher, PasswordHasherInterface, TokenProvider};
use shopsmart_service::{
    AuthService, AuthServiceImpl, CacheInterface, CartService, CartServiceImpl, ImageStorage, LocalImageStorage,
    LogMailer, Mailer, OfflinePaymentGateway, OrderService, OrderServiceImpl, PaymentGateway, ProductService,
    ProductServiceImpl, RedisCacheService, ReviewService, ReviewServiceImpl, UserService, UserServiceImpl,
    WishlistService, WishlistServiceImpl,
};
use std::sync::Arc;
use tracing::info;

/// Creates the Redis-backed cache, or a pass-through one when Redis is disabled.
///
/// The pool connects lazily, so an unreachable Redis only shows up as cache
/// misses and a degraded readiness check.
pub fn create_cache(config: &RedisConfig) -> ShopResult<Arc<RedisCacheService>> {
    if !config.enabled {
        info!("Redis cache disabled, reads go straight to the database");
        return Ok(Arc::new(RedisCacheService::disabled()));
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_size));
    let pool = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .map_err(|e| ShopError::Cache(format!("Failed to create Redis pool: {e}")))?;

    info!("Redis cache pool created (max {} connections)", config.pool_size);
    Ok(Arc::new(RedisCacheService::new(Arc::new(pool))))
}

/// Every service of the store, ready to be served.
pub struct AppModule {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub product_service: Arc<dyn ProductService>,
    pub cart_service: Arc<dyn CartService>,
    pub wishlist_service: Arc<dyn WishlistService>,
    pub order_service: Arc<dyn OrderService>,
    pub review_service: Arc<dyn ReviewService>,
    pub token_provider: Arc<TokenProvider>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppModule {
    /// Handler state for the REST router.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState {
            auth_service: self.auth_service.clone(),
            user_service: self.user_service.clone(),
            product_service: self.product_service.clone(),
            cart_service: self.cart_service.clone(),
            wishlist_service: self.wishlist_service.clone(),
            order_service: self.order_service.clone(),
            review_service: self.review_service.clone(),
            health_checks: self.health_checks.clone(),
        }
    }
}

impl std::fmt::Debug for AppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModule")
            .field("health_checks", &self.health_checks.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`AppModule`].
pub struct AppModuleBuilder {
    config: AppConfig,
    db_pool: Option<Arc<DatabasePool>>,
    cache: Option<Arc<RedisCacheService>>,
}

impl AppModuleBuilder {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            db_pool: None,
            cache: None,
        }
    }

    #[must_use]
    pub fn with_database_pool(mut self, pool: Arc<DatabasePool>) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<RedisCacheService>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Wires repositories, integrations and services.
    ///
    /// # Errors
    /// Returns a configuration error when no database pool was supplied.
    pub fn build(self) -> ShopResult<AppModule> {
        let config = self.config;
        let db_pool = self
            .db_pool
            .ok_or_else(|| ShopError::Configuration("A database pool is required".to_string()))?;
        let redis = match self.cache {
            Some(cache) => cache,
            None => Arc::new(RedisCacheService::disabled()),
        };

        let pool: Arc<dyn DatabasePoolInterface> = db_pool.clone();
        let user_repository: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(pool.clone()));
        let product_repository: Arc<dyn ProductRepository> = Arc::new(MySqlProductRepository::new(pool.clone()));
        let cart_repository: Arc<dyn CartRepository> = Arc::new(MySqlCartRepository::new(pool.clone()));
        let wishlist_repository: Arc<dyn WishlistRepository> = Arc::new(MySqlWishlistRepository::new(pool.clone()));
        let order_repository: Arc<dyn OrderRepository> = Arc::new(MySqlOrderRepository::new(pool.clone()));
        let review_repository: Arc<dyn ReviewRepository> = Arc::new(MySqlReviewRepository::new(pool));

        let cache: Arc<dyn CacheInterface> = redis.clone();
        let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(config.mail.from_address.clone()));
        let image_storage: Arc<dyn ImageStorage> = Arc::new(LocalImageStorage::new(&config.storage));
        let payment_gateway: Arc<dyn PaymentGateway> = Arc::new(OfflinePaymentGateway::new(&config.payment));

        let password_hasher: Arc<dyn PasswordHasherInterface> =
            Arc::new(PasswordHasher::with_cost(config.security.password_hash_cost));
        let token_provider = Arc::new(TokenProvider::new(Arc::new(config.security.clone())));
        let cache_config = Arc::new(config.cache.clone());
        let mail_config = Arc::new(config.mail.clone());

        let auth_service: Arc<dyn AuthService> = Arc::new(AuthServiceImpl::new(
            user_repository.clone(),
            password_hasher,
            token_provider.clone(),
            mailer.clone(),
            cache.clone(),
            mail_config.clone(),
        ));
        let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
            user_repository.clone(),
            cache.clone(),
            cache_config.clone(),
        ));
        let product_service: Arc<dyn ProductService> = Arc::new(ProductServiceImpl::new(
            product_repository.clone(),
            user_repository,
            review_repository.clone(),
            cache.clone(),
            image_storage,
            mailer,
            cache_config,
            mail_config,
        ));
        let cart_service: Arc<dyn CartService> =
            Arc::new(CartServiceImpl::new(cart_repository, product_repository.clone()));
        let wishlist_service: Arc<dyn WishlistService> =
            Arc::new(WishlistServiceImpl::new(wishlist_repository, product_repository.clone()));
        let order_service: Arc<dyn OrderService> = Arc::new(OrderServiceImpl::new(
            order_repository,
            product_repository.clone(),
            payment_gateway,
            cache.clone(),
        ));
        let review_service: Arc<dyn ReviewService> = Arc::new(ReviewServiceImpl::new(
            review_repository,
            product_repository,
            product_service.clone(),
            cache,
        ));

        let database_check: Arc<dyn HealthCheck> = db_pool;
        let cache_check: Arc<dyn HealthCheck> = redis;

        Ok(AppModule {
            auth_service,
            user_service,
            product_service,
            cart_service,
            wishlist_service,
            order_service,
            review_service,
            token_provider,
            health_checks: vec![database_check, cache_check],
        })
    }
}
