//! Pagination types for list operations.
//!
//! Pages are 1-based, matching the `page` query parameter exposed by the
//! listing endpoints.

use serde::{Deserialize, Serialize};

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-based).
    pub page: u32,
    /// The number of items per page.
    pub size: u32,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_SIZE: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_SIZE: u32 = 100;

    /// Creates a new page request. Page 0 is treated as page 1 and the
    /// size is clamped to `1..=MAX_SIZE`.
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, Self::MAX_SIZE),
        }
    }

    /// First page with the default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }

    /// Rows to skip in a `LIMIT ? OFFSET ?` query.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.size as u64
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl PageInfo {
    #[must_use]
    pub fn new(request: PageRequest, total_elements: u64) -> Self {
        Self {
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(request.size)),
        }
    }
}

/// One page of rows plus where it sits in the result set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            info: PageInfo::new(request, total_elements),
        }
    }

    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.info.total_elements
    }

    /// Returns true if a later page holds more rows.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.info.page as u64) < self.info.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(2, 10).offset(), 10);
        assert_eq!(PageRequest::new(5, 15).offset(), 60);
    }

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.page, 1);
        assert_eq!(req.size, PageRequest::MAX_SIZE);
        assert_eq!(PageRequest::new(3, 0).size, 1);
    }

    #[test]
    fn test_total_pages_round_up() {
        let page: Page<i32> = Page::new(vec![1, 2, 3], PageRequest::new(1, 10), 25);
        assert_eq!(page.info.total_pages, 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page: Page<i32> = Page::new(vec![1, 2], PageRequest::new(3, 10), 22);
        assert!(!page.has_next());

        let empty: Page<i32> = Page::new(Vec::new(), PageRequest::first(), 0);
        assert_eq!(empty.info.total_pages, 0);
        assert!(!empty.has_next());
    }
}
