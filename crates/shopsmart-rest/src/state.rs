//! Application state for Axum handlers.

use shopsmart_core::HealthCheck;
use shopsmart_service::{
    AuthService, CartService, OrderService, ProductService, ReviewService, UserService, WishlistService,
};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub product_service: Arc<dyn ProductService>,
    pub cart_service: Arc<dyn CartService>,
    pub wishlist_service: Arc<dyn WishlistService>,
    pub order_service: Arc<dyn OrderService>,
    pub review_service: Arc<dyn ReviewService>,
    /// Dependencies probed by `/ready`.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Adds a dependency probed by the readiness endpoint.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("health_checks", &self.health_checks.len())
            .finish_non_exhaustive()
    }
}
