//! Document records and their leaf collections.
//!
//! A [`Document`] is the full stored shape as it appears inside a service
//! payload. [`CreateDocument`] and [`UpdateDocument`] are the request bodies
//! of the document endpoints; the latter has patch semantics.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::canonical::Timestamp;
use crate::error::ViolationKind;
use crate::record::{RecordReader, RecordRules, Schema};
use crate::rules::{Choice, CountRule, ListOf, Nested, ObjectRule, TextRule, TimestampRule};
use crate::wire_enum::wire_enum;

wire_enum! {
    /// Processing status of a document.
    pub enum DocumentStatus {
        /// Indexed and served.
        Ok => "OK",
        /// Processing failed.
        Error => "ERROR",
        /// Waiting to be processed.
        Pending => "PENDING",
        /// Currently being processed.
        Processing => "PROCESSING",
    }
}

wire_enum! {
    /// Kind of change recorded in a document's history.
    pub enum HistoryAction {
        /// The document was created.
        Create => "cs_create_document",
        /// The document was edited.
        Update => "cs_update_document",
        /// The document was removed.
        Delete => "cs_delete_document",
    }
}

/// A stored rewording of a document's question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paraphrase {
    /// Paraphrase identifier.
    pub paraphrase_id: u64,
    /// The rewording.
    pub text: String,
    /// Who produced it, e.g. `auto` or `operator`.
    pub author: String,
}

impl Schema for Paraphrase {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let paraphrase_id = fields.required("paraphrase_id", CountRule::non_negative());
        let text = fields.required("text", TextRule::text());
        let author = fields.required("author", TextRule::text());
        Some(Self {
            paraphrase_id: paraphrase_id?,
            text: text?,
            author: author?,
        })
    }
}

/// A paraphrase in a request body; every member may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParaphraseDraft {
    /// Existing identifier, when editing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paraphrase_id: Option<u64>,
    /// The rewording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Who produced it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Schema for ParaphraseDraft {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let paraphrase_id = fields.optional("paraphrase_id", CountRule::non_negative());
        let text = fields.optional("text", TextRule::non_blank());
        let author = fields.optional("author", TextRule::non_blank());
        Some(Self {
            paraphrase_id: paraphrase_id?,
            text: text?,
            author: author?,
        })
    }
}

/// A file attached to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// Attachment identifier.
    pub attachment_id: u64,
    /// File name.
    pub name: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema for Attachment {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let attachment_id = fields.required("attachment_id", CountRule::non_negative());
        let name = fields.required("name", TextRule::non_blank());
        let description = fields.optional("description", TextRule::text());
        Some(Self {
            attachment_id: attachment_id?,
            name: name?,
            description: description?,
        })
    }
}

/// The answer in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// Language code such as `ru` or `en`.
    pub language: String,
    /// Answer text.
    pub text: String,
}

impl Schema for Answer {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let language = fields.required("language", TextRule::non_blank().max_chars(10));
        let text = fields.required("text", TextRule::non_blank());
        Some(Self {
            language: language?,
            text: text?,
        })
    }
}

/// The user behind a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentUser {
    /// User identifier.
    pub id: String,
    /// User name.
    pub name: String,
    /// User email.
    pub email: String,
}

impl Schema for DocumentUser {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let id = fields.required("id", TextRule::non_blank());
        let name = fields.required("name", TextRule::non_blank());
        let email = fields.required("email", TextRule::non_blank());
        Some(Self {
            id: id?,
            name: name?,
            email: email?,
        })
    }
}

/// One changed member in a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeItem {
    /// Name of the changed member, e.g. `question`.
    pub item: String,
    /// The new value; may be empty.
    pub value: String,
}

impl Schema for ChangeItem {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let item = fields.required("item", TextRule::non_blank());
        let value = fields.required("value", TextRule::text());
        Some(Self {
            item: item?,
            value: value?,
        })
    }
}

/// An append-only entry in a document's change history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    /// What happened.
    pub name: HistoryAction,
    /// When it happened.
    pub created_at: Timestamp,
    /// Who did it.
    pub user: DocumentUser,
    /// What changed.
    pub changelist: Vec<ChangeItem>,
}

impl Schema for HistoryItem {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let name = fields.required("name", Choice::<HistoryAction>::of());
        let created_at = fields.required("created_at", TimestampRule);
        let user = fields.required("user", Nested::<DocumentUser>::of());
        let changelist = fields.required("changelist", ListOf::new(Nested::<ChangeItem>::of()));
        Some(Self {
            name: name?,
            created_at: created_at?,
            user: user?,
            changelist: changelist?,
        })
    }
}

/// A document as carried inside a service payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Identifier, unique within the service.
    pub document_id: u64,
    /// Document title.
    pub name: String,
    /// Main question, at most 1000 characters.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Processing status.
    pub status: DocumentStatus,
    /// Time of the last change.
    pub modified_at: Timestamp,
    /// Time after which the document is no longer served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<Timestamp>,
    /// Free-form extension data.
    pub ext: Map<String, Value>,
    /// Number of stored paraphrases.
    pub paraphrases_count: u64,
    /// Number of paraphrases awaiting review.
    pub suggested_paraphrases_count: u64,
    /// Stored paraphrases.
    pub paraphrases: Vec<Paraphrase>,
    /// Attached files.
    pub attachments: Vec<Attachment>,
    /// Free-form context data.
    pub context: Map<String, Value>,
    /// Answers in other languages.
    pub answers: Vec<Answer>,
    /// Change history.
    pub history: Vec<HistoryItem>,
}

impl Schema for Document {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let document_id = fields.required("document_id", CountRule::non_negative());
        let name = fields.required("name", TextRule::text());
        let question = fields.required("question", TextRule::non_blank().max_chars(1000));
        let answer = fields.required("answer", TextRule::non_blank());
        let status = fields.required("status", Choice::<DocumentStatus>::of());
        let modified_at = fields.required("modified_at", TimestampRule);
        let expired_at = fields.optional("expired_at", TimestampRule);
        let ext = fields.or_else("ext", ObjectRule, Map::new);
        let paraphrases_count = fields.or("paraphrases_count", CountRule::non_negative(), 0);
        let suggested_paraphrases_count =
            fields.or("suggested_paraphrases_count", CountRule::non_negative(), 0);
        let paraphrases =
            fields.or_else("paraphrases", ListOf::new(Nested::<Paraphrase>::of()), Vec::new);
        let attachments =
            fields.or_else("attachments", ListOf::new(Nested::<Attachment>::of()), Vec::new);
        let context = fields.or_else("context", ObjectRule, Map::new);
        let answers = fields.or_else("answers", ListOf::new(Nested::<Answer>::of()), Vec::new);
        let history = fields.or_else("history", ListOf::new(Nested::<HistoryItem>::of()), Vec::new);
        Some(Self {
            document_id: document_id?,
            name: name?,
            question: question?,
            answer: answer?,
            status: status?,
            modified_at: modified_at?,
            expired_at: expired_at?,
            ext: ext?,
            paraphrases_count: paraphrases_count?,
            suggested_paraphrases_count: suggested_paraphrases_count?,
            paraphrases: paraphrases?,
            attachments: attachments?,
            context: context?,
            answers: answers?,
            history: history?,
        })
    }
}

/// Report repeated `document_id` values and repeated questions in `documents`.
///
/// Questions are compared trimmed and lower-cased. Each repeat is reported
/// on the later item and names the first occurrence.
pub(crate) fn check_unique_documents(documents: &[Document], rules: &mut RecordRules<'_>) {
    let list = rules.path().child("documents");
    let mut ids: HashMap<u64, usize> = HashMap::new();
    let mut questions: HashMap<String, usize> = HashMap::new();
    for (index, document) in documents.iter().enumerate() {
        let item = list.index(index);
        match ids.entry(document.document_id) {
            Entry::Occupied(first) => rules.violation_at(
                &item.child("document_id"),
                ViolationKind::DuplicateValue,
                format!("document_id duplicates documents[{}]", first.get()),
            ),
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
        match questions.entry(document.question.trim().to_lowercase()) {
            Entry::Occupied(first) => rules.violation_at(
                &item.child("question"),
                ViolationKind::DuplicateValue,
                format!("question duplicates documents[{}]", first.get()),
            ),
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
    }
}

/// A document returned as retrieval context; every collection is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentContext {
    /// Document title.
    pub name: String,
    /// Main question.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Processing status.
    pub status: DocumentStatus,
    /// Time of the last change.
    pub modified_at: Timestamp,
    /// Expiry time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<Timestamp>,
    /// Free-form extension data.
    pub ext: Map<String, Value>,
    /// Number of stored paraphrases.
    pub paraphrases_count: u64,
    /// Number of paraphrases awaiting review.
    pub suggested_paraphrases_count: u64,
    /// Paraphrases in draft form.
    pub paraphrases: Vec<ParaphraseDraft>,
    /// Attached files.
    pub attachments: Vec<Attachment>,
    /// Free-form context data.
    pub context: Map<String, Value>,
    /// Answers in other languages.
    pub answers: Vec<Answer>,
    /// Change history.
    pub history: Vec<HistoryItem>,
}

impl Schema for DocumentContext {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let name = fields.required("name", TextRule::non_blank());
        let question = fields.required("question", TextRule::non_blank());
        let answer = fields.required("answer", TextRule::non_blank());
        let status = fields.required("status", Choice::<DocumentStatus>::of());
        let modified_at = fields.required("modified_at", TimestampRule);
        let expired_at = fields.optional("expired_at", TimestampRule);
        let ext = fields.or_else("ext", ObjectRule, Map::new);
        let paraphrases_count = fields.required("paraphrases_count", CountRule::non_negative());
        let suggested_paraphrases_count =
            fields.required("suggested_paraphrases_count", CountRule::non_negative());
        let paraphrases =
            fields.required("paraphrases", ListOf::new(Nested::<ParaphraseDraft>::of()));
        let attachments = fields.required("attachments", ListOf::new(Nested::<Attachment>::of()));
        let context = fields.or_else("context", ObjectRule, Map::new);
        let answers = fields.required("answers", ListOf::new(Nested::<Answer>::of()));
        let history = fields.required("history", ListOf::new(Nested::<HistoryItem>::of()));
        Some(Self {
            name: name?,
            question: question?,
            answer: answer?,
            status: status?,
            modified_at: modified_at?,
            expired_at: expired_at?,
            ext: ext?,
            paraphrases_count: paraphrases_count?,
            suggested_paraphrases_count: suggested_paraphrases_count?,
            paraphrases: paraphrases?,
            attachments: attachments?,
            context: context?,
            answers: answers?,
            history: history?,
        })
    }
}

const NAME: TextRule = TextRule::non_blank().max_chars(500);
const QUESTION: TextRule = TextRule::non_blank().max_chars(5000);
const ANSWER: TextRule = TextRule::non_blank().max_chars(10_000);

/// Request body for creating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDocument {
    /// Owning service.
    pub service_id: u64,
    /// Document title.
    pub name: String,
    /// Main question.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Initial status.
    pub status: DocumentStatus,
    /// Free-form extension data.
    pub ext: Map<String, Value>,
    /// Initial paraphrases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paraphrases: Option<Vec<ParaphraseDraft>>,
}

impl Schema for CreateDocument {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let service_id = fields.required("service_id", CountRule::positive());
        let name = fields.required("name", NAME);
        let question = fields.required("question", QUESTION);
        let answer = fields.required("answer", ANSWER);
        let status = fields.or("status", Choice::<DocumentStatus>::of(), DocumentStatus::Ok);
        let ext = fields.or_else("ext", ObjectRule, Map::new);
        let paraphrases =
            fields.optional("paraphrases", ListOf::new(Nested::<ParaphraseDraft>::of()));
        Some(Self {
            service_id: service_id?,
            name: name?,
            question: question?,
            answer: answer?,
            status: status?,
            ext: ext?,
            paraphrases: paraphrases?,
        })
    }
}

/// Request body for editing a document. Omitted members stay unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateDocument {
    /// Owning service.
    pub service_id: u64,
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// New answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    /// Replacement extension data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Map<String, Value>>,
    /// Replacement paraphrases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paraphrases: Option<Vec<ParaphraseDraft>>,
}

impl Schema for UpdateDocument {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let service_id = fields.required("service_id", CountRule::positive());
        let name = fields.optional("name", NAME);
        let question = fields.optional("question", QUESTION);
        let answer = fields.optional("answer", ANSWER);
        let status = fields.optional("status", Choice::<DocumentStatus>::of());
        let ext = fields.optional("ext", ObjectRule);
        let paraphrases =
            fields.optional("paraphrases", ListOf::new(Nested::<ParaphraseDraft>::of()));
        Some(Self {
            service_id: service_id?,
            name: name?,
            question: question?,
            answer: answer?,
            status: status?,
            ext: ext?,
            paraphrases: paraphrases?,
        })
    }
}

/// Request body describing a document attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentAttachment {
    /// File name.
    pub name: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema for DocumentAttachment {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let name = fields.required("name", TextRule::text());
        let description = fields.optional("description", TextRule::text());
        Some(Self {
            name: name?,
            description: description?,
        })
    }
}

/// Request body replacing a document's tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTags {
    /// The new tag set.
    pub tags: Vec<String>,
}

impl Schema for DocumentTags {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let tags = fields.required("tags", ListOf::new(TextRule::text()));
        Some(Self { tags: tags? })
    }
}
