//! Suggested-item queues and document search.
//!
//! Suggested documents and paraphrases are collected over a time window.
//! Either bound may be omitted; [`SuggestedItems::resolve_window`] fills the
//! gaps from a [`Clock`] so the default window is the last day. When the
//! clock default would not follow a supplied `from`, or precede a supplied
//! `to`, the missing bound is placed one day from the supplied one.

use chrono::TimeDelta;
use mockable::Clock;
use pagination::{PageWindow, PaginationError, ParamSource, SortOrder};
use serde::Serialize;

use super::sorting::SortField;
use crate::canonical::Timestamp;
use crate::error::ViolationKind;
use crate::record::{RecordReader, RecordRules, Schema};
use crate::rules::{Choice, CountRule, IntRule, ListOf, TextRule, TimestampRule};
use crate::wire_enum::wire_enum;

const DEFAULT_SUGGESTED_LIMIT: u64 = 9999;

/// A closed time interval with both bounds known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    /// Inclusive start.
    pub from: Timestamp,
    /// End.
    pub to: Timestamp,
}

fn resolve(from: Option<Timestamp>, to: Option<Timestamp>, clock: &dyn Clock) -> TimeWindow {
    let now = clock.utc();
    let end = match (from, to) {
        (_, Some(end)) => end,
        (Some(start), None) if *start.as_datetime() >= now => shift_days(start, 1),
        _ => Timestamp::from_datetime(now),
    };
    let start = from.unwrap_or_else(|| {
        let day_ago = shift_days(Timestamp::from_datetime(now), -1);
        if day_ago < end {
            day_ago
        } else {
            shift_days(end, -1)
        }
    });
    TimeWindow {
        from: start,
        to: end,
    }
}

fn shift_days(instant: Timestamp, days: i64) -> Timestamp {
    let origin = *instant.as_datetime();
    Timestamp::from_datetime(
        origin
            .checked_add_signed(TimeDelta::days(days))
            .unwrap_or(origin),
    )
}

fn check_order(from: Option<Timestamp>, to: Option<Timestamp>, rules: &mut RecordRules<'_>) {
    if matches!((from, to), (Some(start), Some(end)) if end <= start) {
        rules.violation("to", ViolationKind::CrossFieldViolation, "must be after from");
    }
}

/// Query parameters for the suggested documents and suggested paraphrases
/// queues.
///
/// `count` is an alias of `limit`; `limit` wins when both are supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedItems {
    /// Start of the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Timestamp>,
    /// End of the window; after `from` when both are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Timestamp>,
    /// Resolved page size.
    pub limit: u64,
    /// Items to skip.
    pub offset: u64,
    /// Sort key.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
    #[serde(skip)]
    limit_source: ParamSource,
}

impl SuggestedItems {
    /// Fill omitted window bounds: `to` defaults to now, `from` to one day
    /// before now.
    #[must_use]
    pub fn resolve_window(&self, clock: &dyn Clock) -> TimeWindow {
        resolve(self.from, self.to, clock)
    }

    /// Which parameter name supplied the page size.
    #[must_use]
    pub const fn limit_source(&self) -> ParamSource {
        self.limit_source
    }

    /// The requested slice of the queue.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroLimit`] if the limit is zero, which a
    /// validated record never holds.
    pub const fn page(&self) -> Result<PageWindow, PaginationError> {
        PageWindow::new(self.offset, self.limit)
    }
}

impl Schema for SuggestedItems {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let from = fields.optional("from", TimestampRule);
        let to = fields.optional("to", TimestampRule);
        let limit = fields.aliased("limit", "count", CountRule::positive());
        let offset = fields.or("offset", CountRule::non_negative(), 0);
        let sort_by = fields.or("sort_by", Choice::<SortField>::of(), SortField::Id);
        let sort_order = fields.or("sort_order", Choice::<SortOrder>::of(), SortOrder::Asc);

        let resolved = limit?.resolve_or(DEFAULT_SUGGESTED_LIMIT);
        Some(Self {
            from: from?,
            to: to?,
            limit: resolved.value(),
            offset: offset?,
            sort_by: sort_by?,
            sort_order: sort_order?,
            limit_source: resolved.source(),
        })
    }

    fn check(&self, rules: &mut RecordRules<'_>) {
        check_order(self.from, self.to, rules);
    }
}

/// Query parameters for counting suggested items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedCount {
    /// Start of the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Timestamp>,
    /// End of the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Timestamp>,
    /// Upper bound on the count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl SuggestedCount {
    /// Fill omitted window bounds from `clock`.
    #[must_use]
    pub fn resolve_window(&self, clock: &dyn Clock) -> TimeWindow {
        resolve(self.from, self.to, clock)
    }
}

impl Schema for SuggestedCount {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let from = fields.optional("from", TimestampRule);
        let to = fields.optional("to", TimestampRule);
        let limit = fields.optional("limit", CountRule::positive());
        Some(Self {
            from: from?,
            to: to?,
            limit: limit?,
        })
    }

    fn check(&self, rules: &mut RecordRules<'_>) {
        check_order(self.from, self.to, rules);
    }
}

/// Request body for checking suggested documents for duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedDocumentsValidate {
    /// Start of the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Timestamp>,
    /// End of the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Timestamp>,
    /// Documents to check.
    pub document_ids: Vec<i64>,
}

impl Schema for SuggestedDocumentsValidate {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let from = fields.optional("from", TimestampRule);
        let to = fields.optional("to", TimestampRule);
        let document_ids = fields.required("document_ids", ListOf::new(IntRule::any()));
        Some(Self {
            from: from?,
            to: to?,
            document_ids: document_ids?,
        })
    }

    fn check(&self, rules: &mut RecordRules<'_>) {
        check_order(self.from, self.to, rules);
    }
}

wire_enum! {
    /// Document member a search may be restricted to.
    pub enum FindBy {
        /// The answer text.
        Answer => "answer",
        /// The question text.
        Question => "question",
        /// The document title.
        Name => "name",
        /// The attached scenario.
        Scenario => "scenario",
    }
}

/// Query parameters for full-text document search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchDocuments {
    /// Search text.
    pub query: String,
    /// Members to search; every member when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub find_by: Option<Vec<FindBy>>,
    /// Results to skip.
    pub offset: u64,
    /// Results to return, `1..=1000`.
    pub count: u64,
    /// Sort key.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl SearchDocuments {
    /// The requested slice of the results.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroLimit`] if `count` is zero, which a
    /// validated record never holds.
    pub const fn page(&self) -> Result<PageWindow, PaginationError> {
        PageWindow::new(self.offset, self.count)
    }
}

impl Schema for SearchDocuments {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let query = fields.required("query", TextRule::non_blank());
        let find_by = fields.optional("find_by", ListOf::new(Choice::<FindBy>::of()));
        let offset = fields.or("offset", CountRule::non_negative(), 0);
        let count = fields.or("count", CountRule::between(1, 1000), 100);
        let sort_by = fields.or("sort_by", Choice::<SortField>::of(), SortField::ModifiedAt);
        let sort_order = fields.or("sort_order", Choice::<SortOrder>::of(), SortOrder::Asc);
        Some(Self {
            query: query?,
            find_by: find_by?,
            offset: offset?,
            count: count?,
            sort_by: sort_by?,
            sort_order: sort_order?,
        })
    }
}
