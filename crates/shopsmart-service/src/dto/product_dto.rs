//! Catalog DTOs.

use super::{OwnerSummary, ReviewerSummary};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopsmart_core::validation::rules;
use shopsmart_core::{
    Page, PageRequest, PriceSort, Product, ProductFilter, ProductId, Review, ReviewId, LOW_STOCK_THRESHOLD,
};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Fields of a new product. The image is uploaded separately.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "rules::not_blank")
    )]
    pub name: String,

    #[validate(custom(function = "rules::price_in_range"))]
    pub price: Decimal,

    #[validate(length(max = 100))]
    pub company: Option<String>,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    pub stock: Option<u32>,

    #[serde(default)]
    pub available_colors: Vec<String>,

    #[serde(default)]
    pub available_options: Vec<String>,
}

/// Partial product update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "rules::price_in_range"))]
    pub price: Option<Decimal>,

    #[validate(length(max = 100))]
    pub company: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    pub stock: Option<u32>,

    pub image_url: Option<String>,

    pub available_colors: Option<Vec<String>>,

    pub available_options: Option<Vec<String>>,
}

/// An uploaded product image.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Catalog query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    pub sort: Option<PriceSort>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, at most 100.
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Page requested, with defaults applied.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(PageRequest::DEFAULT_SIZE),
        )
    }

    /// Search criteria, with blank strings treated as absent.
    #[must_use]
    pub fn to_filter(&self) -> ProductFilter {
        let non_blank = |value: &Option<String>| {
            value
                .as_ref()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        ProductFilter {
            owner_id: None,
            category: non_blank(&self.category),
            min_price: self.min_price,
            max_price: self.max_price,
            name: non_blank(&self.name),
            sort: self.sort.unwrap_or_default(),
        }
    }
}

/// A page of products.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<Product>> for ProductListResponse {
    fn from(page: Page<Product>) -> Self {
        let info = page.info;
        Self {
            products: page.content,
            page: info.page,
            size: info.size,
            total_elements: info.total_elements,
            total_pages: info.total_pages,
        }
    }
}

/// A review with its author.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: ReviewId,
    pub rating: u8,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
    /// `None` when the author's account no longer exists.
    pub author: Option<ReviewerSummary>,
}

impl ReviewResponse {
    #[must_use]
    pub fn new(review: Review, author: Option<ReviewerSummary>) -> Self {
        Self {
            id: review.id,
            rating: review.rating,
            feedback: review.feedback,
            created_at: review.created_at,
            author,
        }
    }
}

/// Public product page: product, seller and reviews.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailsResponse {
    pub product: Product,
    pub owner: Option<OwnerSummary>,
    pub reviews: Vec<ReviewResponse>,
    pub review_count: usize,
    /// Mean rating rounded to one decimal, `None` without reviews.
    pub average_rating: Option<f64>,
}

impl ProductDetailsResponse {
    #[must_use]
    pub fn new(product: Product, owner: Option<OwnerSummary>, reviews: Vec<ReviewResponse>) -> Self {
        let review_count = reviews.len();
        let average_rating = (review_count > 0).then(|| {
            let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
            (f64::from(sum) * 10.0 / review_count as f64).round() / 10.0
        });
        Self {
            product,
            owner,
            reviews,
            review_count,
            average_rating,
        }
    }
}

/// Result of a stock check-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Stock is at or below the threshold and the admin was mailed.
    AlertSent,
    Sufficient,
}

/// Stock check-up report for one product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockCheckResponse {
    pub product_id: ProductId,
    pub product_name: String,
    pub stock: u32,
    pub threshold: u32,
    pub status: StockStatus,
}

impl StockCheckResponse {
    #[must_use]
    pub fn new(product: &Product, status: StockStatus) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            stock: product.stock,
            threshold: LOW_STOCK_THRESHOLD,
            status,
        }
    }
}
