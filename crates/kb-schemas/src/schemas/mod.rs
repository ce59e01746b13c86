//! Payload records for the knowledge-base API.
//!
//! Each record implements [`crate::Schema`]: its `read` declares the field
//! constraints, its `check` holds record-level rules. Records are grouped by
//! the API area they serve.

mod account;
mod conversation;
mod delivery;
mod document;
mod paraphrase;
mod prompt;
mod query;
mod reporting;
mod service;
mod sorting;
mod suggested;

pub use account::{UserCreate, UserUpdate};
pub use conversation::{
    ChannelUser, ClosingReason, CloseConversation, GetConversations, Operator, OrderDirection,
    Question,
};
pub use delivery::{
    DayOfWeek, DelayedDelivery, DeliveryState, DeliveryText, EveryWeek, FilterItem, FilterType,
    Interval, Schedule, TextKind, Var, WeeklyPlan,
};
pub use document::{
    Answer, Attachment, ChangeItem, CreateDocument, Document, DocumentAttachment,
    DocumentContext, DocumentStatus, DocumentTags, DocumentUser, HistoryAction, HistoryItem,
    Paraphrase, ParaphraseDraft, UpdateDocument,
};
pub use paraphrase::{
    CreateParaphrase, GetParaphrases, MassMoveParaphrases, MassUpdateParaphrases,
    ParaphraseEdit, ParaphraseMove, UpdateParaphrase,
};
pub use prompt::{EnabledParts, Guideline, QaItem, QaType, ServicePrompt, ServicePromptQa};
pub use query::{BatchQuery, Query};
pub use reporting::{
    ConversationGrouping, ConversationsCountReport, DateGrouping, DateRange, OperatorGrouping,
    OperatorsReport,
};
pub use service::{
    GroupsList, LanguagePreset, ProcessingMethod, QueryLength, ServiceCreate, ServiceDocumentsGet,
    ServiceGet, ServiceIds, ServicesGet, ServicesValidations, TermPayload,
    UpdateServiceAttachment,
};
pub use sorting::SortField;
pub use suggested::{
    FindBy, SearchDocuments, SuggestedCount, SuggestedDocumentsValidate, SuggestedItems,
    TimeWindow,
};
