//! Product entity and catalog query filter.

use crate::{ProductId, ShopError, ShopResult, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category assigned when none is provided.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Stock level at or below which a product is reported as low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Largest amount a `DECIMAL(12, 2)` money column holds: 9,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Decimal places kept for money.
pub const MONEY_SCALE: u32 = 2;

/// A catalog item owned by a seller (or an admin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: ProductId,
    pub owner_id: UserId,
    pub name: String,
    pub image_url: String,
    pub price: Decimal,
    pub company: Option<String>,
    pub category: String,
    pub stock: u32,
    pub available_colors: Vec<String>,
    pub available_options: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub image_url: String,
    pub price: Decimal,
    pub company: Option<String>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub available_colors: Vec<String>,
    pub available_options: Vec<String>,
}

impl Product {
    /// Builds a product owned by `owner_id`, applying the category and stock defaults.
    #[must_use]
    pub fn new(owner_id: UserId, new: NewProduct) -> Self {
        let now = Utc::now();
        let category = new
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        Self {
            id: ProductId::new(),
            owner_id,
            name: new.name.trim().to_string(),
            image_url: new.image_url,
            price: new.price,
            company: new.company,
            category,
            stock: new.stock.unwrap_or(0),
            available_colors: new.available_colors,
            available_options: new.available_options,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn is_low_stock(&self, threshold: u32) -> bool {
        self.stock <= threshold
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn total_for(&self, quantity: u32) -> Decimal {
        self.price * Decimal::from(quantity)
    }

    /// Price of `quantity` units, refused when it does not fit an order total.
    pub fn order_total(&self, quantity: u32) -> ShopResult<Decimal> {
        self.price
            .checked_mul(Decimal::from(quantity))
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or_else(|| {
                ShopError::business_rule(format!(
                    "Order total for {quantity} x '{}' exceeds the maximum of {MAX_AMOUNT}",
                    self.name
                ))
            })
    }
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
#[must_use]
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Sort direction for catalog listings, by price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PriceSort {
    #[default]
    Asc,
    Desc,
}

/// Catalog search criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Restrict to one seller's products.
    pub owner_id: Option<UserId>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
    pub sort: PriceSort,
}

impl ProductFilter {
    /// True when no user-supplied criterion narrows or reorders the listing.
    /// The owner restriction is not a user filter: it follows from the role.
    #[must_use]
    pub fn has_user_filters(&self) -> bool {
        self.category.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.name.is_some()
            || self.sort != PriceSort::Asc
    }

    /// Checks a product against the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.owner_id.is_some_and(|owner| owner != product.owner_id) {
            return false;
        }
        if self.category.as_ref().is_some_and(|c| c != &product.category) {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if let Some(name) = &self.name {
            if !product.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, price: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            image_url: "/uploads/p.png".to_string(),
            price: Decimal::from(price),
            company: None,
            category: None,
            stock: None,
            available_colors: vec![],
            available_options: vec![],
        }
    }

    #[test]
    fn test_defaults_applied() {
        let product = Product::new(UserId::new(), new_product("Lamp", 20));
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert_eq!(product.stock, 0);
        assert!(product.is_low_stock(LOW_STOCK_THRESHOLD));
    }

    #[test]
    fn test_total_for_quantity() {
        let product = Product::new(UserId::new(), new_product("Lamp", 20));
        assert_eq!(product.total_for(3), Decimal::from(60));
    }

    #[test]
    fn test_max_amount_matches_column() {
        assert_eq!(MAX_AMOUNT.to_string(), "9999999999.99");
    }

    #[test]
    fn test_order_total_rejects_amounts_beyond_column() {
        let mut product = Product::new(UserId::new(), new_product("Lamp", 20));
        assert_eq!(product.order_total(3).unwrap(), Decimal::from(60));

        product.price = Decimal::new(9_999_999_999, 2);
        let err = product.order_total(1000).unwrap_err();
        assert!(matches!(err, ShopError::BusinessRule(_)));
        assert_eq!(product.order_total(1).unwrap(), product.price);
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv(" 64GB, 128GB ,,256GB"), vec!["64GB", "128GB", "256GB"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn test_filter_detection() {
        let owner = UserId::new();
        let seller_scope = ProductFilter {
            owner_id: Some(owner),
            ..ProductFilter::default()
        };
        assert!(!seller_scope.has_user_filters());

        let sorted_desc = ProductFilter {
            sort: PriceSort::Desc,
            ..ProductFilter::default()
        };
        assert!(sorted_desc.has_user_filters());

        let by_name = ProductFilter {
            name: Some("lamp".to_string()),
            ..ProductFilter::default()
        };
        assert!(by_name.has_user_filters());
    }

    #[test]
    fn test_filter_matches() {
        let owner = UserId::new();
        let product = Product::new(owner, new_product("Desk Lamp", 20));

        let filter = ProductFilter {
            name: Some("LAMP".to_string()),
            min_price: Some(Decimal::from(10)),
            max_price: Some(Decimal::from(20)),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&product));

        let too_cheap = ProductFilter {
            max_price: Some(Decimal::from(19)),
            ..ProductFilter::default()
        };
        assert!(!too_cheap.matches(&product));

        let other_owner = ProductFilter {
            owner_id: Some(UserId::new()),
            ..ProductFilter::default()
        };
        assert!(!other_owner.matches(&product));
    }
}
