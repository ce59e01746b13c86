//! Error types for pagination window construction.

use thiserror::Error;

/// Errors raised when a page window cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A window must address at least one item.
    #[error("page limit must be at least 1")]
    ZeroLimit,

    /// Page numbers start at 1.
    #[error("page number must be at least 1")]
    ZeroPage,

    /// The computed offset does not fit in 64 bits.
    #[error("page {page} with {per_page} items per page overflows the offset range")]
    OffsetOverflow {
        /// One-based page number that was requested.
        page: u64,
        /// Number of items per page.
        per_page: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_overflow_formats_correctly() {
        let err = PaginationError::OffsetOverflow {
            page: 3,
            per_page: u64::MAX,
        };
        assert_eq!(
            err.to_string(),
            format!("page 3 with {} items per page overflows the offset range", u64::MAX)
        );
    }

    #[test]
    fn zero_limit_formats_correctly() {
        assert_eq!(
            PaginationError::ZeroLimit.to_string(),
            "page limit must be at least 1"
        );
    }
}
