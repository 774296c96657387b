//! MySQL repository implementations.

mod cart_repository;
mod order_repository;
mod product_repository;
mod review_repository;
mod user_repository;

pub use cart_repository::*;
pub use order_repository::*;
pub use product_repository::*;
pub use review_repository::*;
pub use user_repository::*;

use shopsmart_core::{ShopError, ShopResult};
use std::str::FromStr;
use uuid::Uuid;

/// Parses a `CHAR(36)` column into a typed id.
pub(crate) fn parse_id<T: From<Uuid>>(column: &str, value: &str) -> ShopResult<T> {
    Uuid::parse_str(value)
        .map(T::from)
        .map_err(|e| ShopError::internal(format!("Invalid UUID in {column}: {e}")))
}

/// Parses a string enum column.
pub(crate) fn parse_enum<T>(column: &str, value: &str) -> ShopResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ShopError::internal(format!("Invalid value in {column}: {e}")))
}

/// Widens a row count from MySQL's signed `COUNT(*)`.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopsmart_core::{OrderStatus, ProductId};

    #[test]
    fn test_parse_id() {
        let id: ProductId = parse_id("products.id", "550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert!(parse_id::<ProductId>("products.id", "oops").is_err());
    }

    #[test]
    fn test_parse_enum() {
        let status: OrderStatus = parse_enum("orders.status", "shipped").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
        let err = parse_enum::<OrderStatus>("orders.status", "lost").unwrap_err();
        assert!(err.to_string().contains("orders.status"));
    }

    #[test]
    fn test_count_to_u64() {
        assert_eq!(count_to_u64(42), 42);
        assert_eq!(count_to_u64(-1), 0);
    }
}
