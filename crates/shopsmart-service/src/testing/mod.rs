//! In-memory wiring of every service for tests in this and downstream crates.

mod doubles;
mod repositories;

pub use doubles::*;
pub use repositories::*;

use crate::cache::CacheInterface;
use crate::integrations::{ImageStorage, Mailer, OfflinePaymentGateway, PaymentGateway};
use crate::{
    AuthService, AuthServiceImpl, CartService, CartServiceImpl, OrderService, OrderServiceImpl, ProductService,
    ProductServiceImpl, ReviewService, ReviewServiceImpl, UserService, UserServiceImpl, WishlistService,
    WishlistServiceImpl,
};
use rust_decimal::Decimal;
use shopsmart_config::{CacheConfig, MailConfig, PaymentConfig, SecurityConfig};
use shopsmart_core::{Actor, NewProduct, Product, User, UserId, UserRole};
use shopsmart_security::{PasswordHasher, PasswordHasherInterface, TokenProvider};
use std::sync::Arc;

/// Password given to every seeded user.
pub const TEST_PASSWORD: &str = "secret1";

/// Services over in-memory repositories, a counting cache and recording integrations.
pub struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub products: Arc<InMemoryProductRepository>,
    pub carts: Arc<InMemoryCartRepository>,
    pub wishlists: Arc<InMemoryWishlistRepository>,
    pub orders: Arc<InMemoryOrderRepository>,
    pub reviews: Arc<InMemoryReviewRepository>,
    pub cache: Arc<InMemoryCache>,
    pub mailer: Arc<RecordingMailer>,
    pub images: Arc<MemoryImageStorage>,
    pub password_hasher: Arc<PasswordHasher>,
    pub token_provider: Arc<TokenProvider>,
    pub mail_config: Arc<MailConfig>,
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub product_service: Arc<dyn ProductService>,
    pub cart_service: Arc<dyn CartService>,
    pub wishlist_service: Arc<dyn WishlistService>,
    pub order_service: Arc<dyn OrderService>,
    pub review_service: Arc<dyn ReviewService>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(Arc::new(InMemoryCache::new()))
    }

    #[must_use]
    pub fn with_cache(cache: Arc<InMemoryCache>) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let products = Arc::new(InMemoryProductRepository::new());
        let carts = Arc::new(InMemoryCartRepository::new());
        let wishlists = Arc::new(InMemoryWishlistRepository::new());
        let orders = Arc::new(InMemoryOrderRepository::new(products.clone()));
        let reviews = Arc::new(InMemoryReviewRepository::new());
        let mailer = Arc::new(RecordingMailer::new());
        let images = Arc::new(MemoryImageStorage::new());
        let password_hasher = Arc::new(PasswordHasher::with_cost(1));
        let token_provider = Arc::new(TokenProvider::new(Arc::new(SecurityConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            ..SecurityConfig::default()
        })));
        let mail_config = Arc::new(MailConfig::default());
        let cache_config = Arc::new(CacheConfig::default());
        let payment_gateway: Arc<dyn PaymentGateway> =
            Arc::new(OfflinePaymentGateway::new(&PaymentConfig::default()));

        let cache_dyn: Arc<dyn CacheInterface> = cache.clone();
        let mailer_dyn: Arc<dyn Mailer> = mailer.clone();
        let images_dyn: Arc<dyn ImageStorage> = images.clone();

        let auth_service: Arc<dyn AuthService> = Arc::new(AuthServiceImpl::new(
            users.clone(),
            password_hasher.clone(),
            token_provider.clone(),
            mailer_dyn.clone(),
            cache_dyn.clone(),
            mail_config.clone(),
        ));
        let user_service: Arc<dyn UserService> =
            Arc::new(UserServiceImpl::new(users.clone(), cache_dyn.clone(), cache_config.clone()));
        let product_service: Arc<dyn ProductService> = Arc::new(ProductServiceImpl::new(
            products.clone(),
            users.clone(),
            reviews.clone(),
            cache_dyn.clone(),
            images_dyn,
            mailer_dyn,
            cache_config,
            mail_config.clone(),
        ));
        let cart_service: Arc<dyn CartService> = Arc::new(CartServiceImpl::new(carts.clone(), products.clone()));
        let wishlist_service: Arc<dyn WishlistService> =
            Arc::new(WishlistServiceImpl::new(wishlists.clone(), products.clone()));
        let order_service: Arc<dyn OrderService> = Arc::new(OrderServiceImpl::new(
            orders.clone(),
            products.clone(),
            payment_gateway,
            cache_dyn.clone(),
        ));
        let review_service: Arc<dyn ReviewService> = Arc::new(ReviewServiceImpl::new(
            reviews.clone(),
            products.clone(),
            product_service.clone(),
            cache_dyn,
        ));

        Self {
            users,
            products,
            carts,
            wishlists,
            orders,
            reviews,
            cache,
            mailer,
            images,
            password_hasher,
            token_provider,
            mail_config,
            auth_service,
            user_service,
            product_service,
            cart_service,
            wishlist_service,
            order_service,
            review_service,
        }
    }

    /// Stores a user whose password is [`TEST_PASSWORD`].
    ///
    /// # Panics
    /// Panics if hashing fails.
    pub fn seed_user(&self, name: &str, email: &str, role: UserRole) -> User {
        let hash = self.password_hasher.hash(TEST_PASSWORD).expect("hash test password");
        let user = User::new(Some(name.to_string()), email, hash, role);
        self.users.insert(user.clone());
        user
    }

    /// Stores a product owned by `owner`.
    pub fn seed_product(&self, owner: UserId, name: &str, price: i64, stock: u32) -> Product {
        let product = Product::new(
            owner,
            NewProduct {
                name: name.to_string(),
                image_url: format!("/uploads/{}.png", name.to_lowercase().replace(' ', "-")),
                price: Decimal::from(price),
                company: None,
                category: None,
                stock: Some(stock),
                available_colors: Vec::new(),
                available_options: Vec::new(),
            },
        );
        self.products.insert(product.clone());
        product
    }

    /// Shorthand for the actor of a seeded user.
    #[must_use]
    pub fn actor(user: &User) -> Actor {
        Actor::new(user.id, user.role)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
