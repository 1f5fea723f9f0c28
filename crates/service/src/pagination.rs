//! Pagination utilities for the service layer
//!
//! `PageRequest` carries the (already normalized) page window handed to the
//! repositories; `Pagination` is the metadata assembled for list responses.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
/// Highest page whose offset still fits a signed 64-bit SQL bind at any limit.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_LIMIT;

/// Page window: 1-based page index and page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Clamp raw caller input: `1 <= page <= MAX_PAGE`, `1 <= limit <= 100`.
    pub fn normalized(page: i64, limit: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { (page as u64).min(MAX_PAGE) };
        let limit = (limit.max(1) as u64).min(MAX_LIMIT);
        Self { page, limit }
    }

    /// Rows to skip before the first row of this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT } }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
}

impl Pagination {
    pub fn new(page: PageRequest, total_items: u64) -> Self {
        let total_pages = if page.limit == 0 { 0 } else { total_items.div_ceil(page.limit) };
        Self {
            current_page: page.page,
            total_pages,
            total_items,
            items_per_page: page.limit,
        }
    }
}
