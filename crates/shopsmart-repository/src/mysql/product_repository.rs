//! MySQL product repository implementation.

use super::{count_to_u64, parse_id};
use crate::{traits::ProductRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopsmart_core::{Page, PageRequest, PriceSort, Product, ProductFilter, ProductId, ShopError, ShopResult};
use sqlx::types::Json;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const PRODUCT_COLUMNS: &str = "id, owner_id, name, image_url, price, company, category, stock, \
                               available_colors, available_options, created_at, updated_at";

/// MySQL product repository implementation.
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlProductRepository {
    /// Creates a new MySQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    owner_id: String,
    name: String,
    image_url: String,
    price: Decimal,
    company: Option<String>,
    category: String,
    stock: u32,
    available_colors: Json<Vec<String>>,
    available_options: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = ShopError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: parse_id("products.id", &row.id)?,
            owner_id: parse_id("products.owner_id", &row.owner_id)?,
            name: row.name,
            image_url: row.image_url,
            price: row.price,
            company: row.company,
            category: row.category,
            stock: row.stock,
            available_colors: row.available_colors.0,
            available_options: row.available_options.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Escapes `LIKE` wildcards so the user's text matches literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Appends the `WHERE` clause for `filter`.
fn push_filter(query: &mut QueryBuilder<'_, MySql>, filter: &ProductFilter) {
    query.push(" WHERE 1 = 1");
    if let Some(owner) = filter.owner_id {
        query.push(" AND owner_id = ").push_bind(owner.to_string());
    }
    if let Some(category) = &filter.category {
        query.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(min) = filter.min_price {
        query.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        query.push(" AND price <= ").push_bind(max);
    }
    if let Some(name) = &filter.name {
        query.push(" AND LOWER(name) LIKE ").push_bind(like_pattern(name));
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_by_id(&self, id: ProductId) -> ShopResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(Product::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> ShopResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<MySql> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.to_string());
        }
        separated.push_unseparated(")");

        let rows = query.build_query_as::<ProductRow>().fetch_all(self.pool.inner()).await?;
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn search(&self, filter: &ProductFilter, page: PageRequest) -> ShopResult<Page<Product>> {
        debug!("Searching products: {:?}, page: {}, size: {}", filter, page.page, page.size);

        let mut count_query: QueryBuilder<MySql> = QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query.build_query_scalar().fetch_one(self.pool.inner()).await?;

        let mut query: QueryBuilder<MySql> = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filter(&mut query, filter);
        query.push(match filter.sort {
            PriceSort::Asc => " ORDER BY price ASC, created_at ASC, id ASC",
            PriceSort::Desc => " ORDER BY price DESC, created_at ASC, id ASC",
        });
        query.push(" LIMIT ").push_bind(page.limit());
        query.push(" OFFSET ").push_bind(page.offset());

        let rows = query.build_query_as::<ProductRow>().fetch_all(self.pool.inner()).await?;
        let products = rows.into_iter().map(Product::try_from).collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(products, page, count_to_u64(total)))
    }

    async fn find_low_stock(&self, threshold: u32) -> ShopResult<Vec<Product>> {
        debug!("Finding products with stock <= {}", threshold);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock <= ? ORDER BY stock ASC, name ASC"
        ))
        .bind(threshold)
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn save(&self, product: &Product) -> ShopResult<Product> {
        debug!("Saving new product: {}", product.name);

        sqlx::query(
            r"
            INSERT INTO products (id, owner_id, name, image_url, price, company, category, stock,
                                  available_colors, available_options, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(product.id.to_string())
        .bind(product.owner_id.to_string())
        .bind(&product.name)
        .bind(&product.image_url)
        .bind(product.price)
        .bind(&product.company)
        .bind(&product.category)
        .bind(product.stock)
        .bind(Json(&product.available_colors))
        .bind(Json(&product.available_options))
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(product.id)
            .await?
            .ok_or_else(|| ShopError::internal("Failed to fetch inserted product"))
    }

    async fn update(&self, product: &Product) -> ShopResult<Product> {
        debug!("Updating product: {}", product.id);

        sqlx::query(
            r"
            UPDATE products
            SET name = ?, image_url = ?, price = ?, company = ?, category = ?,
                available_colors = ?, available_options = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(&product.name)
        .bind(&product.image_url)
        .bind(product.price)
        .bind(&product.company)
        .bind(&product.category)
        .bind(Json(&product.available_colors))
        .bind(Json(&product.available_options))
        .bind(product.updated_at)
        .bind(product.id.to_string())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(product.id)
            .await?
            .ok_or_else(|| ShopError::not_found("Product", product.id))
    }

    async fn set_stock(&self, id: ProductId, stock: u32) -> ShopResult<bool> {
        debug!("Setting stock of product {} to {}", id, stock);

        let result = sqlx::query("UPDATE products SET stock = ?, updated_at = ? WHERE id = ?")
            .bind(stock)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ProductId) -> ShopResult<bool> {
        debug!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for MySqlProductRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlProductRepository").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopsmart_core::UserId;
    use sqlx::Execute;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Lamp"), "%lamp%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_push_filter_binds_only_present_criteria() {
        let filter = ProductFilter {
            owner_id: Some(UserId::new()),
            min_price: Some(Decimal::from(5)),
            name: Some("lamp".to_string()),
            ..ProductFilter::default()
        };
        let mut query: QueryBuilder<MySql> = QueryBuilder::new("SELECT COUNT(*) FROM products");
        push_filter(&mut query, &filter);
        let built = query.build();
        let sql = built.sql();

        assert!(sql.contains("owner_id = ?"));
        assert!(sql.contains("price >= ?"));
        assert!(sql.contains("LOWER(name) LIKE ?"));
        assert!(!sql.contains("category"));
        assert!(!sql.contains("price <= ?"));
    }
}
