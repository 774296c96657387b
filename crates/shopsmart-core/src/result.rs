//! Result type aliases for ShopSmart.

use crate::ShopError;

/// A specialized `Result` type for ShopSmart operations.
pub type ShopResult<T> = Result<T, ShopError>;
