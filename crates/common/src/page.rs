//! Page envelope for paginated listings.
//!
//! Every listing endpoint uses a fixed page size of 10 items. The envelope
//! carries the items together with the metadata the rendering layer needs;
//! transforms over a page must pass the metadata through unmodified.

use serde::{Deserialize, Serialize};

/// Fixed page size for all paginated listings.
pub const PAGE_SIZE: u64 = 10;

/// A page of items with pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u64,
    /// Page size used for the query.
    pub per_page: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Create a page envelope.
    #[must_use]
    pub const fn new(items: Vec<T>, page: u64, total_items: u64, total_pages: u64) -> Self {
        Self {
            items,
            page,
            per_page: PAGE_SIZE,
            total_items,
            total_pages,
        }
    }

    /// Map the items of this page, preserving the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Query parameters for paginated listings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// 1-based page number; defaults to the first page.
    #[serde(default = "default_page")]
    pub page: u64,
}

impl PageQuery {
    /// 0-based page index for the query layer.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.page.saturating_sub(1)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: default_page() }
    }
}

const fn default_page() -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_metadata() {
        let page = Page::new(vec![1, 2, 3], 2, 23, 3);
        let mapped = page.map(|n| n * 10);

        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.per_page, PAGE_SIZE);
        assert_eq!(mapped.total_items, 23);
        assert_eq!(mapped.total_pages, 3);
    }

    #[test]
    fn test_page_query_index_is_zero_based() {
        assert_eq!(PageQuery { page: 1 }.index(), 0);
        assert_eq!(PageQuery { page: 3 }.index(), 2);
        // Page 0 is treated as the first page rather than underflowing
        assert_eq!(PageQuery { page: 0 }.index(), 0);
    }
}
