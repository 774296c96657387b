//! # ShopSmart Service
//!
//! Business logic for the store: authentication, catalog, cart, wishlist,
//! orders and reviews. Reads of products, product details, listings and
//! public profiles go through the cache-aside layer in [`cache`].

pub mod auth_service;
pub mod cache;
pub mod cart_service;
pub mod dto;
pub mod r#impl;
pub mod integrations;
pub mod order_service;
pub mod product_service;
pub mod user_service;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use auth_service::*;
pub use cache::*;
pub use cart_service::*;
pub use dto::*;
pub use integrations::*;
pub use order_service::*;
pub use product_service::*;
pub use r#impl::*;
pub use user_service::*;
