//! Cache key generators for consistent key naming.
//!
//! Every cached read and every invalidation goes through these functions, so
//! a writer always deletes exactly the keys a reader may have populated.

use shopsmart_core::{PageRequest, ProductId, UserId};

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "shopsmart:cache";

/// Keys and glob patterns to delete after a write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    pub keys: Vec<String>,
    pub patterns: Vec<String>,
}

/// Owner view of a single product.
#[must_use]
pub fn product(id: ProductId) -> String {
    format!("{CACHE_PREFIX}:product:{id}")
}

/// Product with owner summary and reviews.
#[must_use]
pub fn product_details(id: ProductId) -> String {
    format!("{CACHE_PREFIX}:product_details:{id}")
}

/// Unfiltered catalog page.
#[must_use]
pub fn products_all(page: PageRequest) -> String {
    format!("{CACHE_PREFIX}:products:all:p{}:l{}", page.page, page.size)
}

/// Unfiltered catalog page of one seller.
#[must_use]
pub fn products_by_seller(seller: UserId, page: PageRequest) -> String {
    format!("{CACHE_PREFIX}:products:seller:{seller}:p{}:l{}", page.page, page.size)
}

/// Public profile of a user.
#[must_use]
pub fn user_public(id: UserId) -> String {
    format!("{CACHE_PREFIX}:user:public:{id}")
}

/// Admin user-list page.
#[must_use]
pub fn users_list(page: PageRequest) -> String {
    format!("{CACHE_PREFIX}:users:list:p{}:l{}", page.page, page.size)
}

/// Pattern matching every unfiltered catalog page.
#[must_use]
pub fn products_all_pattern() -> String {
    format!("{CACHE_PREFIX}:products:all:*")
}

/// Pattern matching every seller catalog page.
#[must_use]
pub fn products_seller_pattern() -> String {
    format!("{CACHE_PREFIX}:products:seller:*")
}

/// Pattern matching every user-list page.
#[must_use]
pub fn users_list_pattern() -> String {
    format!("{CACHE_PREFIX}:users:list:*")
}

/// Entries affected by creating, updating, deleting or restocking a product.
#[must_use]
pub fn product_write(id: ProductId) -> Invalidation {
    Invalidation {
        keys: vec![product(id), product_details(id)],
        patterns: vec![products_all_pattern(), products_seller_pattern()],
    }
}

/// Entries affected by a review of the product.
#[must_use]
pub fn review_write(product_id: ProductId) -> Invalidation {
    Invalidation {
        keys: vec![product_details(product_id)],
        patterns: Vec::new(),
    }
}

/// Entries affected by a signup, profile change or password reset.
#[must_use]
pub fn user_write(id: UserId) -> Invalidation {
    Invalidation {
        keys: vec![user_public(id)],
        patterns: vec![users_list_pattern()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_keys_include_page_and_size() {
        let first = products_all(PageRequest::new(1, 10));
        let second = products_all(PageRequest::new(2, 10));
        assert_eq!(first, "shopsmart:cache:products:all:p1:l10");
        assert_ne!(first, second);
        assert_eq!(users_list(PageRequest::new(3, 25)), "shopsmart:cache:users:list:p3:l25");
    }

    #[test]
    fn test_seller_key_contains_seller() {
        let seller = UserId::new();
        let key = products_by_seller(seller, PageRequest::first());
        assert!(key.starts_with("shopsmart:cache:products:seller:"));
        assert!(key.contains(&seller.to_string()));
    }

    #[test]
    fn test_product_write_covers_item_and_lists() {
        let id = ProductId::new();
        let invalidation = product_write(id);
        assert!(invalidation.keys.contains(&product(id)));
        assert!(invalidation.keys.contains(&product_details(id)));
        assert!(invalidation.patterns.contains(&products_all_pattern()));
        assert!(invalidation.patterns.contains(&products_seller_pattern()));
    }

    #[test]
    fn test_review_write_touches_details_only() {
        let id = ProductId::new();
        let invalidation = review_write(id);
        assert_eq!(invalidation.keys, vec![product_details(id)]);
        assert!(invalidation.patterns.is_empty());
    }
}
