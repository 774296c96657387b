//! # ShopSmart Server Library
//!
//! Service wiring and startup helpers shared by the `shopsmart-server`
//! binary and its tests.

pub mod di;
pub mod startup;
