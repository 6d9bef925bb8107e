//! Offset pagination primitives shared by templatehub endpoints.
//!
//! [`PageRequest`] captures a validated zero-based page index and page size.
//! [`Page`] carries one page of items together with the size of the complete
//! filtered set so clients can compute how many pages exist.
//!
//! # Examples
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(1, 20)?;
//! assert_eq!(request.offset(), 20);
//!
//! let page = Page::new(vec!["a", "b"], 22, request);
//! assert_eq!(page.total_pages(), 2);
//! # Ok::<(), pagination::PaginationError>(())
//! ```

use serde::Serialize;
use thiserror::Error;

/// Page size used when callers do not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised while validating pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The requested page size was zero.
    #[error("page size must be at least 1")]
    ZeroPageSize,
    /// The requested page size exceeded [`MAX_PAGE_SIZE`].
    #[error("page size must be at most {max}, got {requested}")]
    PageSizeTooLarge {
        /// Size the caller asked for.
        requested: u32,
        /// Largest accepted size.
        max: u32,
    },
}

/// Validated zero-based page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Validate a page index and size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `size` is zero or larger than
    /// [`MAX_PAGE_SIZE`].
    pub const fn new(page: u32, size: u32) -> Result<Self, PaginationError> {
        if size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        if size > MAX_PAGE_SIZE {
            return Err(PaginationError::PageSizeTooLarge {
                requested: size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, size })
    }

    /// First page with the given size.
    ///
    /// # Errors
    ///
    /// See [`PageRequest::new`].
    pub const fn first(size: u32) -> Result<Self, PaginationError> {
        Self::new(0, size)
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of rows to skip, suitable for SQL `OFFSET`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Number of rows to fetch, suitable for SQL `LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the size of the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total_elements: u64,
    page: u32,
    size: u32,
}

impl<T> Page<T> {
    /// Assemble a page from its items and the total number of matches.
    #[must_use]
    pub const fn new(items: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_elements,
            page: request.page,
            size: request.size,
        }
    }

    /// Page containing no items and reporting no matches.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of matches across every page.
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Zero-based index of this page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of pages needed to show every match.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.size))
    }

    /// Transform each item, keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page: self.page,
            size: self.size,
        }
    }
}
