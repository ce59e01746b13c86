//! Offset/limit windows over an ordered result set.

use serde::Serialize;

use crate::PaginationError;

/// A validated `offset`/`limit` window.
///
/// ## Invariants
/// - `limit` is at least 1.
///
/// # Examples
///
/// ```
/// use pagination::PageWindow;
///
/// let window = PageWindow::from_page(3, 50).expect("valid page");
/// assert_eq!(window.offset(), 100);
/// assert_eq!(window.limit(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageWindow {
    offset: u64,
    limit: u64,
}

impl PageWindow {
    /// Build a window from an explicit offset and limit.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroLimit`] when `limit` is zero.
    pub const fn new(offset: u64, limit: u64) -> Result<Self, PaginationError> {
        if limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        Ok(Self { offset, limit })
    }

    /// Build a window from a one-based page number and a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPage`] for page 0,
    /// [`PaginationError::ZeroLimit`] for an empty page size, and
    /// [`PaginationError::OffsetOverflow`] when the offset exceeds `u64`.
    pub fn from_page(page: u64, per_page: u64) -> Result<Self, PaginationError> {
        let skipped = page.checked_sub(1).ok_or(PaginationError::ZeroPage)?;
        let offset = skipped
            .checked_mul(per_page)
            .ok_or(PaginationError::OffsetOverflow { page, per_page })?;
        Self::new(offset, per_page)
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum number of items to return.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }
}
