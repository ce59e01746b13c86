//! Reporting queries.

use serde::Serialize;
use serde_json::Value;

use crate::canonical::Timestamp;
use crate::error::ViolationKind;
use crate::record::{RecordReader, RecordRules, Schema};
use crate::rules::{AnyValue, Choice, ListOf, Nested, TimestampRule};
use crate::wire_enum::wire_enum;

wire_enum! {
    /// Bucket size along the time axis.
    pub enum DateGrouping {
        /// One bucket per day.
        ByDay => "ByDay",
        /// One bucket per week.
        ByWeek => "ByWeek",
        /// One bucket per month.
        ByMonth => "ByMonth",
        /// One bucket per year.
        ByYear => "ByYear",
    }
}

wire_enum! {
    /// Secondary split of the conversation count report.
    pub enum ConversationGrouping {
        /// Split by operator group.
        ByGroup => "ByGroup",
        /// Split by channel.
        ByChannel => "ByChannel",
        /// Split by operator.
        ByOperator => "ByOperator",
    }
}

wire_enum! {
    /// Secondary split of the operator report.
    pub enum OperatorGrouping {
        /// Split by operator.
        ByOperator => "ByOperator",
        /// Split by operator group.
        ByGroup => "ByGroup",
        /// Split by channel.
        ByChannel => "ByChannel",
        /// No secondary split.
        Ungrouped => "None",
    }
}

/// Reporting period; `to` may equal `from` but not precede it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// Period start.
    pub from: Timestamp,
    /// Period end.
    pub to: Timestamp,
}

impl Schema for DateRange {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let from = fields.required("from", TimestampRule);
        let to = fields.required("to", TimestampRule);
        Some(Self {
            from: from?,
            to: to?,
        })
    }

    fn check(&self, rules: &mut RecordRules<'_>) {
        if self.to < self.from {
            rules.violation("to", ViolationKind::CrossFieldViolation, "must not precede from");
        }
    }
}

/// Request body for the conversation count report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationsCountReport {
    /// Reporting period.
    pub date_range: DateRange,
    /// Time bucket size.
    pub date_grouping: DateGrouping,
    /// Secondary split.
    pub additional_grouping: ConversationGrouping,
    /// Knowledge bases to include.
    pub knowledge_bases: Vec<Value>,
    /// Document tags to include.
    pub document_tags: Vec<Value>,
    /// Operator groups to include.
    pub groups: Vec<Value>,
    /// Extra filters, passed through.
    pub filters: Vec<Value>,
}

impl Schema for ConversationsCountReport {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let date_range = fields.required("dateRange", Nested::<DateRange>::of());
        let date_grouping =
            fields.or("dateGrouping", Choice::<DateGrouping>::of(), DateGrouping::ByWeek);
        let additional_grouping = fields.or(
            "additionalGrouping",
            Choice::<ConversationGrouping>::of(),
            ConversationGrouping::ByGroup,
        );
        let knowledge_bases = fields.or_else("knowledgeBases", ListOf::new(AnyValue), Vec::new);
        let document_tags = fields.or_else("documentTags", ListOf::new(AnyValue), Vec::new);
        let groups = fields.or_else("groups", ListOf::new(AnyValue), Vec::new);
        let filters = fields.or_else("filters", ListOf::new(AnyValue), Vec::new);
        Some(Self {
            date_range: date_range?,
            date_grouping: date_grouping?,
            additional_grouping: additional_grouping?,
            knowledge_bases: knowledge_bases?,
            document_tags: document_tags?,
            groups: groups?,
            filters: filters?,
        })
    }
}

/// Request body for the operator activity report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorsReport {
    /// Reporting period.
    pub date_range: DateRange,
    /// Operators to include.
    pub operators: Vec<Value>,
    /// Operator groups to include.
    pub groups: Vec<Value>,
    /// Knowledge bases to include.
    pub knowledge_bases: Vec<Value>,
    /// Time bucket size.
    pub date_grouping: DateGrouping,
    /// Secondary split.
    pub additional_grouping: OperatorGrouping,
}

impl Schema for OperatorsReport {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let date_range = fields.required("dateRange", Nested::<DateRange>::of());
        let operators = fields.or_else("operators", ListOf::new(AnyValue), Vec::new);
        let groups = fields.or_else("groups", ListOf::new(AnyValue), Vec::new);
        let knowledge_bases = fields.or_else("knowledgeBases", ListOf::new(AnyValue), Vec::new);
        let date_grouping =
            fields.or("dateGrouping", Choice::<DateGrouping>::of(), DateGrouping::ByDay);
        let additional_grouping = fields.or(
            "additionalGrouping",
            Choice::<OperatorGrouping>::of(),
            OperatorGrouping::ByGroup,
        );
        Some(Self {
            date_range: date_range?,
            operators: operators?,
            groups: groups?,
            knowledge_bases: knowledge_bases?,
            date_grouping: date_grouping?,
            additional_grouping: additional_grouping?,
        })
    }
}
