//! Pagination primitives shared by knowledge-base list and search queries.
//!
//! The crate is transport agnostic: callers hand it values that have
//! already been parsed and range-checked, and it answers three questions.
//!
//! - Which of two names for the same parameter should be used
//!   ([`AliasPair`]).
//! - Which way results are sorted ([`SortOrder`]).
//! - Which slice of a result set a request addresses ([`PageWindow`]).
//!
//! # Example
//!
//! ```
//! use pagination::{AliasPair, PageWindow, ParamSource};
//!
//! let limit = AliasPair::new(Some(25_u64), Some(10)).resolve_or(9999);
//! assert_eq!(limit.value(), 25);
//! assert_eq!(limit.source(), ParamSource::Canonical);
//!
//! let window = PageWindow::new(0, limit.value()).expect("limit is positive");
//! assert_eq!(window.limit(), 25);
//! ```

mod alias;
mod error;
mod order;
mod window;

pub use alias::{AliasPair, ParamSource, Resolved};
pub use error::PaginationError;
pub use order::{ParseSortOrderError, SortOrder};
pub use window::PageWindow;
