//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `product_service.rs`).

mod auth_service_impl;
mod cart_service_impl;
mod order_service_impl;
mod product_service_impl;
mod user_service_impl;

pub use auth_service_impl::AuthServiceImpl;
pub use cart_service_impl::{CartServiceImpl, WishlistServiceImpl};
pub use order_service_impl::{OrderServiceImpl, ReviewServiceImpl};
pub use product_service_impl::ProductServiceImpl;
pub use user_service_impl::UserServiceImpl;
