//! In-memory repositories.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use shopsmart_core::{
    normalize_email, CartItem, Order, OrderId, OrderStatus, Page, PageRequest, PriceSort, Product, ProductFilter,
    ProductId, Review, ShopError, ShopResult, User, UserId, WishlistItem,
};
use shopsmart_repository::{
    CartRepository, OrderRepository, ProductRepository, ReviewRepository, UserRepository, WishlistRepository,
};
use std::collections::HashMap;
use std::sync::Arc;

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Page<T> {
    let content = items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect();
    Page::new(content, page, items.len() as u64)
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.lock().insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> ShopResult<Option<User>> {
        Ok(self.users.lock().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> ShopResult<Vec<User>> {
        let users = self.users.lock();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn find_by_email(&self, email: &str) -> ShopResult<Option<User>> {
        let email = normalize_email(email);
        Ok(self.users.lock().values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> ShopResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn find_all(&self, page: PageRequest) -> ShopResult<Page<User>> {
        let mut users: Vec<User> = self.users.lock().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(&users, page))
    }

    async fn save(&self, user: &User) -> ShopResult<User> {
        let mut users = self.users.lock();
        if users.values().any(|u| u.email == user.email) {
            return Err(ShopError::conflict("Email is already registered"));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> ShopResult<User> {
        let mut users = self.users.lock();
        if !users.contains_key(&user.id) {
            return Err(ShopError::not_found("User", user.id));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: Mutex<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: Product) {
        self.products.lock().insert(product.id, product);
    }

    /// Current stock, bypassing any cache.
    #[must_use]
    pub fn stock_of(&self, id: ProductId) -> Option<u32> {
        self.products.lock().get(&id).map(|p| p.stock)
    }

    /// Atomically decrements stock the way the SQL repository does.
    fn reserve(&self, id: ProductId, quantity: u32) -> ShopResult<()> {
        let mut products = self.products.lock();
        let product = products.get_mut(&id).ok_or_else(|| ShopError::not_found("Product", id))?;
        if product.stock < quantity {
            return Err(ShopError::business_rule("Insufficient stock"));
        }
        product.stock -= quantity;
        product.updated_at = Utc::now();
        Ok(())
    }

    fn release(&self, id: ProductId, quantity: u32) {
        if let Some(product) = self.products.lock().get_mut(&id) {
            product.stock += quantity;
            product.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> ShopResult<Option<Product>> {
        Ok(self.products.lock().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> ShopResult<Vec<Product>> {
        let products = self.products.lock();
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> ShopResult<Page<Product>> {
        let mut matching: Vec<Product> = self
            .products
            .lock()
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            let by_price = match filter.sort {
                PriceSort::Asc => a.price.cmp(&b.price),
                PriceSort::Desc => b.price.cmp(&a.price),
            };
            by_price.then(a.created_at.cmp(&b.created_at)).then(a.id.cmp(&b.id))
        });
        Ok(paginate(&matching, page))
    }

    async fn find_low_stock(&self, threshold: u32) -> ShopResult<Vec<Product>> {
        let mut low: Vec<Product> = self
            .products
            .lock()
            .values()
            .filter(|p| p.is_low_stock(threshold))
            .cloned()
            .collect();
        low.sort_by(|a, b| a.stock.cmp(&b.stock).then(a.name.cmp(&b.name)));
        Ok(low)
    }

    async fn save(&self, product: &Product) -> ShopResult<Product> {
        self.products.lock().insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn update(&self, product: &Product) -> ShopResult<Product> {
        let mut products = self.products.lock();
        let stored = products
            .get_mut(&product.id)
            .ok_or_else(|| ShopError::not_found("Product", product.id))?;
        let stock = stored.stock;
        *stored = Product {
            stock,
            ..product.clone()
        };
        Ok(stored.clone())
    }

    async fn set_stock(&self, id: ProductId, stock: u32) -> ShopResult<bool> {
        let mut products = self.products.lock();
        let Some(product) = products.get_mut(&id) else {
            return Ok(false);
        };
        product.stock = stock;
        product.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: ProductId) -> ShopResult<bool> {
        Ok(self.products.lock().remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCartRepository {
    lines: Mutex<HashMap<UserId, Vec<CartItem>>>,
}

impl InMemoryCartRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<CartItem>> {
        Ok(self.lines.lock().get(&user_id).cloned().unwrap_or_default())
    }

    async fn add_one(&self, user_id: UserId, product_id: ProductId) -> ShopResult<()> {
        let mut lines = self.lines.lock();
        let cart = lines.entry(user_id).or_default();
        match cart.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.quantity += 1,
            None => cart.push(CartItem {
                product_id,
                quantity: 1,
                added_at: Utc::now(),
            }),
        }
        Ok(())
    }

    async fn remove(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool> {
        let mut lines = self.lines.lock();
        let Some(cart) = lines.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = cart.len();
        cart.retain(|line| line.product_id != product_id);
        Ok(cart.len() != before)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryWishlistRepository {
    items: Mutex<HashMap<UserId, Vec<WishlistItem>>>,
}

impl InMemoryWishlistRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WishlistRepository for InMemoryWishlistRepository {
    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<WishlistItem>> {
        Ok(self.items.lock().get(&user_id).cloned().unwrap_or_default())
    }

    async fn add(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool> {
        let mut items = self.items.lock();
        let list = items.entry(user_id).or_default();
        if list.iter().any(|item| item.product_id == product_id) {
            return Ok(false);
        }
        list.push(WishlistItem {
            product_id,
            added_at: Utc::now(),
        });
        Ok(true)
    }

    async fn remove(&self, user_id: UserId, product_id: ProductId) -> ShopResult<bool> {
        let mut items = self.items.lock();
        let Some(list) = items.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|item| item.product_id != product_id);
        Ok(list.len() != before)
    }
}

/// Orders backed by an [`InMemoryProductRepository`] for stock reservation.
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    products: Arc<InMemoryProductRepository>,
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    #[must_use]
    pub fn new(products: Arc<InMemoryProductRepository>) -> Self {
        Self {
            products,
            orders: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn place(&self, order: &Order) -> ShopResult<Order> {
        self.products.reserve(order.product_id, order.quantity)?;
        self.orders.lock().insert(order.id, order.clone());
        Ok(order.clone())
    }

    async fn find_by_id(&self, id: OrderId) -> ShopResult<Option<Order>> {
        Ok(self.orders.lock().get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> ShopResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .lock()
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn update(&self, order: &Order) -> ShopResult<Order> {
        let mut orders = self.orders.lock();
        if !orders.contains_key(&order.id) {
            return Err(ShopError::not_found("Order", order.id));
        }
        orders.insert(order.id, order.clone());
        Ok(order.clone())
    }

    async fn cancel(&self, order: &Order) -> ShopResult<Order> {
        let mut orders = self.orders.lock();
        let stored = orders
            .get_mut(&order.id)
            .ok_or_else(|| ShopError::not_found("Order", order.id))?;
        if stored.status != OrderStatus::Cancelled {
            self.products.release(order.product_id, order.quantity);
        }
        *stored = Order {
            status: OrderStatus::Cancelled,
            ..order.clone()
        };
        Ok(stored.clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryReviewRepository {
    reviews: Mutex<Vec<Review>>,
}

impl InMemoryReviewRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_by_product(&self, product_id: ProductId) -> ShopResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .reviews
            .lock()
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn upsert(&self, review: &Review) -> ShopResult<Review> {
        let mut reviews = self.reviews.lock();
        if let Some(existing) = reviews
            .iter_mut()
            .find(|r| r.product_id == review.product_id && r.user_id == review.user_id)
        {
            existing.rating = review.rating;
            existing.feedback.clone_from(&review.feedback);
            existing.created_at = review.created_at;
            return Ok(existing.clone());
        }
        reviews.push(review.clone());
        Ok(review.clone())
    }
}
