//! Conversation payloads exchanged with the chat platform.
//!
//! These records use the platform's camelCase member names on the wire.

use pagination::{PageWindow, PaginationError};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::canonical::Timestamp;
use crate::error::ViolationKind;
use crate::record::{RecordReader, RecordRules, Schema};
use crate::rules::{
    Choice, CountRule, IntRule, ListOf, Nested, ObjectRule, TextRule, TimestampRule, UuidRule,
};
use crate::wire_enum::wire_enum;

wire_enum! {
    /// Why a conversation was closed.
    pub enum ClosingReason {
        /// The bot answered and closed it.
        ClosedByBot => "ClosedByBot",
        /// An operator closed it.
        ClosedByOperator => "ClosedByOperator",
        /// An operator closed it after handing back to the bot.
        ClosedByOperatorWithBot => "ClosedByOperatorWithBot",
        /// It timed out.
        ClosedByTimer => "ClosedByTimer",
    }
}

wire_enum! {
    /// Ordering of a conversation listing.
    pub enum OrderDirection {
        /// Oldest first.
        Asc => "Asc",
        /// Newest first.
        Desc => "Desc",
    }
}

/// The end user behind a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelUser {
    /// Channel-local identifier.
    pub id: String,
    /// Login.
    pub login: String,
    /// Email.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Full name.
    pub full_name: String,
    /// Free-form attributes.
    pub payload: Map<String, Value>,
}

impl Schema for ChannelUser {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let id = fields.required("id", TextRule::text());
        let login = fields.required("login", TextRule::text());
        let email = fields.required("email", TextRule::text());
        let phone = fields.required("phone", TextRule::text());
        let full_name = fields.required("fullName", TextRule::text());
        let payload = fields.or_else("payload", ObjectRule, Map::new);
        Some(Self {
            id: id?,
            login: login?,
            email: email?,
            phone: phone?,
            full_name: full_name?,
            payload: payload?,
        })
    }
}

/// An incoming user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Time the message was sent.
    pub dt: Timestamp,
    /// Message text.
    pub text: String,
    /// Attached files.
    pub file_ids: Vec<Uuid>,
    /// Sender.
    pub channel_user: ChannelUser,
}

impl Schema for Question {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let dt = fields.required("dt", TimestampRule);
        let text = fields.required("text", TextRule::text());
        let file_ids = fields.or_else("fileIds", ListOf::new(UuidRule), Vec::new);
        let channel_user = fields.required("channelUser", Nested::<ChannelUser>::of());
        Some(Self {
            dt: dt?,
            text: text?,
            file_ids: file_ids?,
            channel_user: channel_user?,
        })
    }
}

/// The operator who closed a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    /// Email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Full name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Free-form attributes.
    pub payload: Map<String, Value>,
}

impl Schema for Operator {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let email = fields.optional("email", TextRule::text());
        let login = fields.optional("login", TextRule::text());
        let phone = fields.optional("phone", TextRule::text());
        let full_name = fields.optional("fullName", TextRule::text());
        let payload = fields.or_else("payload", ObjectRule, Map::new);
        Some(Self {
            email: email?,
            login: login?,
            phone: phone?,
            full_name: full_name?,
            payload: payload?,
        })
    }
}

/// Request body for closing a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseConversation {
    /// Closing reason.
    pub reason: ClosingReason,
    /// Service the conversation is attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_to_autofaq_service_id: Option<i64>,
    /// Document the conversation is attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_to_autofaq_document_id: Option<i64>,
    /// Closing operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
}

impl Schema for CloseConversation {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let reason = fields.or("reason", Choice::<ClosingReason>::of(), ClosingReason::ClosedByBot);
        let service_id = fields.optional("closeToAutofaqServiceId", IntRule::any());
        let document_id = fields.optional("closeToAutofaqDocumentId", IntRule::any());
        let operator = fields.optional("operator", Nested::<Operator>::of());
        Some(Self {
            reason: reason?,
            close_to_autofaq_service_id: service_id?,
            close_to_autofaq_document_id: document_id?,
            operator: operator?,
        })
    }
}

/// Query parameters for listing conversations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetConversations {
    /// Start of the period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_from: Option<Timestamp>,
    /// End of the period; after `tsFrom` when both are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_to: Option<Timestamp>,
    /// Page size, `1..=100`.
    pub limit: u64,
    /// One-based page number.
    pub page: u64,
    /// Ordering.
    pub order_direction: OrderDirection,
    /// Closing reasons to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_status_list: Option<Vec<ClosingReason>>,
    /// Free-text filter on the channel user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_user_query: Option<String>,
    /// Operators who took part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participating_operator_list: Option<Vec<String>>,
    /// Conversation themes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_list: Option<Vec<String>>,
    /// Operator groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_list: Option<Vec<String>>,
}

impl GetConversations {
    /// Offset window addressed by `page` and `limit`.
    ///
    /// # Errors
    ///
    /// Returns a [`PaginationError`] only for values a validated record
    /// never holds.
    pub fn window(&self) -> Result<PageWindow, PaginationError> {
        PageWindow::from_page(self.page, self.limit)
    }
}

impl Schema for GetConversations {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let ts_from = fields.optional("tsFrom", TimestampRule);
        let ts_to = fields.optional("tsTo", TimestampRule);
        let limit = fields.or("limit", CountRule::between(1, 100), 50);
        let page = fields.or("page", CountRule::positive(), 1);
        let order_direction =
            fields.or("orderDirection", Choice::<OrderDirection>::of(), OrderDirection::Desc);
        let statuses = fields.optional(
            "conversationStatusList",
            ListOf::new(Choice::<ClosingReason>::of()),
        );
        let channel_user_query = fields.optional("channelUserQuery", TextRule::text());
        let operators = fields.optional("participatingOperatorList", ListOf::new(TextRule::text()));
        let themes = fields.optional("themeList", ListOf::new(TextRule::text()));
        let groups = fields.optional("groupList", ListOf::new(TextRule::text()));
        Some(Self {
            ts_from: ts_from?,
            ts_to: ts_to?,
            limit: limit?,
            page: page?,
            order_direction: order_direction?,
            conversation_status_list: statuses?,
            channel_user_query: channel_user_query?,
            participating_operator_list: operators?,
            theme_list: themes?,
            group_list: groups?,
        })
    }

    fn check(&self, rules: &mut RecordRules<'_>) {
        if matches!((self.ts_from, self.ts_to), (Some(from), Some(to)) if to <= from) {
            rules.violation(
                "tsTo",
                ViolationKind::CrossFieldViolation,
                "must be after tsFrom",
            );
        }
    }
}
