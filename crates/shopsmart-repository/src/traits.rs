//! Repository trait definitions.

use async_trait::async_trait;
use shopsmart_core::{
    CartItem, Interface, Order, OrderId, Page, PageRequest, Product, ProductFilter, ProductId, Review, ShopResult,
    User, UserId, WishlistItem,
};

/// User repository trait.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> ShopResult<Option<User>>;

    /// Finds several users at once. Missing ids are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> ShopResult<Vec<User>>;

    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> ShopResult<Option<User>>;

    /// Checks if an email is registered.
    async fn exists_by_email(&self, email: &str) -> ShopResult<bool>;

    /// Lists users, newest first.
    async fn find_all(&self, page: PageRequest) -> ShopResult<Page<User>>;

    /// Saves a new user. Duplicate emails fail with `Conflict`.
    async fn save(&self, user: &User) -> ShopResult<User>;

    /// Updates an existing user.
    async fn update(&self, user: &User) -> ShopResult<User>;
}

/// Product repository trait.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> ShopResult<Option<Product>>;

    /// Finds several products at once. Missing ids are skipped.
    async fn find_by_ids(&self, ids: &[ProductId]) -> ShopResult<Vec<Product>>;

    /// Filters, sorts by price and paginates the catalog.
    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> ShopResult<Page<Product>>;

    /// Returns every product with `stock <= threshold`, lowest stock first.
    async fn find_low_stock(&self, threshold: u32) -> ShopResult<Vec<Product>>;

    /// Saves a new product.
    async fn save(&self, product: &Product) -> ShopResult<Product>;

    /// Updates the catalog fields of an existing product.
    ///
    /// Stock is left alone: orders change it concurrently, so it is only
    /// written through [`ProductRepository::set_stock`].
    async fn update(&self, product: &Product) -> ShopResult<Product>;

    /// Overwrites the stock level. Returns false if the product does not exist.
    async fn set_stock(&self, id: ProductId, stock: u32) -> ShopResult<bool>;

    /// Deletes a product. Returns false if it did not exist.
    async fn delete(&self, id: ProductId) -> ShopResult<bool>;
}

/// Cart repository trait.
#[async_trait]
pub trait CartRepository: Interface + Send + Sync {
    /// Returns a user's cart lines, oldest first.
    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<CartItem>>;

    /// Adds one unit: increments an existing line or inserts a line of quantity 1.
    async fn add_one(&self, user_id: UserId, product_id: ProductId) -> ShopResult<()>;

    /// Removes a line. Returns false if it was not in the cart.
    async fn remove(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool>;
}

/// Wishlist repository trait.
#[async_trait]
pub trait WishlistRepository: Interface + Send + Sync {
    /// Returns a user's wishlist, oldest first.
    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<WishlistItem>>;

    /// Adds a product. Returns false if it was already present.
    async fn add(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool>;

    /// Removes a product. Returns false if it was not present.
    async fn remove(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool>;
}

/// Order repository trait.
#[async_trait]
pub trait OrderRepository: Interface + Send + Sync {
    /// Atomically reserves stock for the order and stores it.
    ///
    /// Fails with `NotFound` if the product no longer exists and with
    /// `BusinessRule` if its stock is below the ordered quantity.
    async fn place(&self, order: &Order) -> ShopResult<Order>;

    /// Finds an order by ID.
    async fn find_by_id(&self, id: OrderId) -> ShopResult<Option<Order>>;

    /// Returns a user's orders, newest first.
    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<Order>>;

    /// Persists status, tracking, delivery and payment fields.
    async fn update(&self, order: &Order) -> ShopResult<Order>;

    /// Stores a cancelled order and returns its units to the product's stock.
    ///
    /// The stock is released once: cancelling an order already stored as
    /// cancelled changes nothing.
    async fn cancel(&self, order: &Order) -> ShopResult<Order>;
}

/// Review repository trait.
#[async_trait]
pub trait ReviewRepository: Interface + Send + Sync {
    /// Returns a product's reviews, newest first.
    async fn find_by_product(&self, product_id: ProductId) -> ShopResult<Vec<Review>>;

    /// Inserts the review or replaces the author's previous one for the product.
    async fn upsert(&self, review: &Review) -> ShopResult<Review>;
}
