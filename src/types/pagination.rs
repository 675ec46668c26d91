//! Pagination types for list pages.

use serde::Serialize;

use crate::config::{DEFAULT_PAGE_NUMBER, DIRECTORY_PAGE_SIZE};

/// Requested page number, parsed leniently from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Parse a raw `page` parameter. Anything that is not an integer, or is
    /// below 1, means the first page. Digit strings too large for `u64`
    /// saturate so they clamp to the last page.
    pub fn parse(raw: Option<&str>) -> Self {
        let page = raw
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
            .map(|v| v.parse::<u64>().unwrap_or(u64::MAX))
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_PAGE_NUMBER);

        Self {
            page,
            per_page: DIRECTORY_PAGE_SIZE,
        }
    }

    /// Number of pages needed for `total` items; never less than one.
    pub fn num_pages(&self, total: u64) -> u64 {
        if self.per_page == 0 || total == 0 {
            return 1;
        }
        total.div_ceil(self.per_page)
    }

    /// Clamp the requested page into `1..=num_pages`.
    pub fn clamp(&self, total: u64) -> u64 {
        self.page.clamp(1, self.num_pages(total))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DIRECTORY_PAGE_SIZE,
        }
    }
}

/// One page of results together with its position in the full set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Current page (1-indexed, already clamped)
    pub number: u64,
    pub num_pages: u64,
    /// Total matching items across every page
    pub total: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u64, per_page: u64, total: u64) -> Self {
        let request = PageRequest {
            page: number,
            per_page,
        };
        Self {
            items,
            number,
            num_pages: request.num_pages(total),
            total,
            per_page,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }
}
