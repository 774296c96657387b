//! # ShopSmart REST
//!
//! HTTP API of the store built on Axum: authentication, catalog, cart,
//! wishlist, orders, reviews and admin endpoints, plus health probes and
//! Swagger UI.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
