//! Pagination extractor.

use serde::Deserialize;
use shopsmart_core::PageRequest;
use utoipa::IntoParams;

/// Query parameters for paginated listings. Pages are 1-based.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number, starting at 1.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size, at most 100.
    #[serde(default)]
    pub size: Option<u32>,
}

impl From<PaginationQuery> for PageRequest {
    fn from(query: PaginationQuery) -> Self {
        PageRequest::new(
            query.page.unwrap_or(1),
            query.size.unwrap_or(PageRequest::DEFAULT_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_first_page() {
        let page: PageRequest = PaginationQuery::default().into();
        assert_eq!(page, PageRequest::first());
    }

    #[test]
    fn test_size_is_clamped() {
        let page: PageRequest = PaginationQuery {
            page: Some(3),
            size: Some(10_000),
        }
        .into();
        assert_eq!(page.page, 3);
        assert_eq!(page.size, PageRequest::MAX_SIZE);
    }
}
