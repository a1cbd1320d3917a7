//! Page/limit normalization and pagination metadata.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

const DEFAULT_LIMIT_NON_ZERO: NonZeroUsize = match NonZeroUsize::new(DEFAULT_LIMIT) {
    Some(limit) => limit,
    None => panic!("default limit must be non-zero"),
};

/// A normalized page request: `page >= 1` and `limit >= 1`.
///
/// Zero or absent inputs are replaced by [`DEFAULT_PAGE`] and
/// [`DEFAULT_LIMIT`]. The limit is held as a [`NonZeroUsize`], so a zero
/// divisor cannot reach [`PageRequest::total_pages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: NonZeroUsize,
}

impl PageRequest {
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        let page = page.filter(|&page| page > 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(NonZeroUsize::new)
            .unwrap_or(DEFAULT_LIMIT_NON_ZERO);
        Self { page, limit }
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn limit(&self) -> usize {
        self.limit.get()
    }

    /// Number of records preceding this page.
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit.get())
    }

    /// `ceil(total_data / limit)`; zero when there is no data.
    pub const fn total_pages(&self, total_data: usize) -> usize {
        total_data.div_ceil(self.limit.get())
    }

    /// Whether this page lies past the last page of `total_data` records.
    pub const fn overshoots(&self, total_data: usize) -> bool {
        total_data > 0 && self.page > self.total_pages(total_data)
    }

    /// Returns the same request moved to the last page of `total_data`.
    #[must_use]
    pub const fn last_page(self, total_data: usize) -> Self {
        let last = self.total_pages(total_data);
        Self {
            page: if last == 0 { DEFAULT_PAGE } else { last },
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub total_data: usize,
    pub page: usize,
    pub limit: usize,
    pub total_page: usize,
}

impl Meta {
    pub const fn new(request: PageRequest, total_data: usize) -> Self {
        Self {
            total_data,
            page: request.page(),
            limit: request.limit(),
            total_page: request.total_pages(total_data),
        }
    }

    /// Normalizes raw query values and computes the metadata in one step.
    pub fn from_raw(page: Option<usize>, limit: Option<usize>, total_data: usize) -> Self {
        Self::new(PageRequest::new(page, limit), total_data)
    }
}
