//! Pagination utilities shared by the service and HTTP layers.
//!
//! Provides a simple `Pagination` struct (deserializable from query strings)
//! and helpers to normalize inputs and compute page counts.

use serde::Deserialize;

/// Upper bound on `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Clamp to sane defaults and convert to `(zero_based_page, per_page)`.
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }

    /// Row offset of the first item on this page.
    pub fn offset(self) -> u64 {
        let (idx, per_page) = self.normalize();
        idx * per_page
    }

    /// Number of pages needed to hold `total` items.
    pub fn total_pages(self, total: u64) -> u64 {
        let (_, per_page) = self.normalize();
        total.div_ceil(per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}
