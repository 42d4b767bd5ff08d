//! Page-number pagination primitives shared by backend list endpoints.
//!
//! Pagination here is deliberately dumb: a [`PageRequest`] is parsed (and
//! clamped) from query parameters, and [`paginate`] is a pure function from a
//! fully filtered, ordered sequence to one [`Page`] of it. Out-of-range page
//! numbers never fail; they produce an empty page so clients can walk off the
//! end of a shrinking result set without special-casing.

use serde::Serialize;
use thiserror::Error;

/// Page size applied when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Raised when a pagination query parameter is not a usable integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageParamError {
    /// The `page` parameter did not parse as an integer.
    #[error("page must be an integer")]
    Page,
    /// The `size` parameter did not parse as a positive integer.
    #[error("size must be a positive integer")]
    Size,
}

/// Validated pagination request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let req = PageRequest::new(-3, 20);
/// assert_eq!(req.page(), 1);
/// assert_eq!(req.size(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request, clamping the page number to a minimum of 1 and the
    /// page size to at least one item.
    #[must_use]
    pub fn new(page: i64, size: usize) -> Self {
        Self {
            page: usize::try_from(page.max(1)).unwrap_or(1),
            size: size.max(1),
        }
    }

    /// Parse the raw `page`/`size` query parameters.
    ///
    /// Missing parameters fall back to page 1 and [`DEFAULT_PAGE_SIZE`];
    /// non-numeric values are rejected rather than silently defaulted.
    pub fn from_params(
        page: Option<&str>,
        size: Option<&str>,
    ) -> Result<Self, PageParamError> {
        let page = match page {
            None | Some("") => 1,
            Some(raw) => raw.parse::<i64>().map_err(|_| PageParamError::Page)?,
        };
        let size = match size {
            None | Some("") => DEFAULT_PAGE_SIZE,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(PageParamError::Size)?,
        };
        Ok(Self::new(page, size))
    }

    /// Effective page number (1-based).
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Effective page size.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// One page of a result set plus the bookkeeping list endpoints return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items on this page, in sequence order.
    pub items: Vec<T>,
    /// The 1-based page number actually served.
    pub page: usize,
    /// The page size actually applied.
    pub page_size: usize,
    /// `ceil(total_count / page_size)`.
    pub total_page: usize,
    /// Size of the whole filtered sequence.
    pub total_count: usize,
}

/// Extract one page from an already filtered and ordered sequence.
///
/// # Examples
/// ```
/// use pagination::{paginate, PageRequest};
///
/// let page = paginate((1..=25).collect(), PageRequest::new(3, 10));
/// assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
/// assert_eq!(page.total_page, 3);
/// assert_eq!(page.total_count, 25);
/// ```
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_count = items.len();
    let total_page = total_count.div_ceil(request.size());
    let start = (request.page() - 1).saturating_mul(request.size());
    let items: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(request.size())
        .collect();
    Page {
        items,
        page: request.page(),
        page_size: request.size(),
        total_page,
        total_count,
    }
}
