//! Named access to every payload schema.
//!
//! Request handlers that only know the schema by name call
//! [`validate_named`] and receive the normalised record as JSON. Typed
//! callers use [`crate::validate`] directly.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::record::{Schema, validate};
use crate::schemas::{
    BatchQuery, CloseConversation, ConversationsCountReport, CreateDocument, CreateParaphrase,
    DelayedDelivery, Document, DocumentAttachment, DocumentContext, DocumentTags,
    GetConversations, GetParaphrases, GroupsList, MassMoveParaphrases, MassUpdateParaphrases,
    OperatorsReport, Query, Question, SearchDocuments, ServiceCreate, ServiceDocumentsGet,
    ServiceGet, ServiceIds, ServicePrompt, ServicePromptQa, ServicesGet, ServicesValidations,
    SuggestedCount, SuggestedDocumentsValidate, SuggestedItems, TermPayload, UpdateDocument,
    UpdateParaphrase, UpdateServiceAttachment, UserCreate, UserUpdate, Var,
};
use crate::wire_enum::{WireEnum, wire_enum};

wire_enum! {
    /// Stable name of each payload schema.
    pub enum SchemaName {
        /// [`UserCreate`].
        UserCreate => "user_create",
        /// [`UserUpdate`].
        UserUpdate => "user_update",
        /// [`ServiceCreate`].
        ServiceCreate => "service_create",
        /// [`ServicesGet`].
        ServicesGet => "services_get",
        /// [`ServiceIds`].
        ServiceIds => "service_ids",
        /// [`ServiceGet`].
        ServiceGet => "service_get",
        /// [`ServiceDocumentsGet`].
        ServiceDocumentsGet => "service_documents_get",
        /// [`ServicesValidations`].
        ServicesValidations => "services_validations",
        /// [`UpdateServiceAttachment`].
        UpdateServiceAttachment => "update_service_attachment",
        /// [`GroupsList`].
        GroupsList => "groups_list",
        /// [`TermPayload`] for a service dictionary.
        ServiceTerm => "service_term",
        /// [`TermPayload`] for a user dictionary.
        UserTerm => "user_term",
        /// [`ServicePrompt`].
        ServicePrompt => "service_prompt",
        /// [`ServicePromptQa`].
        ServicePromptQa => "service_prompt_qa",
        /// [`Document`].
        Document => "document",
        /// [`DocumentContext`].
        DocumentContext => "document_context",
        /// [`CreateDocument`].
        CreateDocument => "create_document",
        /// [`UpdateDocument`].
        UpdateDocument => "update_document",
        /// [`DocumentAttachment`].
        DocumentAttachment => "document_attachment",
        /// [`DocumentTags`].
        DocumentTags => "document_tags",
        /// [`CreateParaphrase`].
        CreateParaphrase => "create_paraphrase",
        /// [`GetParaphrases`].
        GetParaphrases => "get_paraphrases",
        /// [`MassUpdateParaphrases`].
        MassUpdateParaphrases => "mass_update_paraphrases",
        /// [`UpdateParaphrase`].
        UpdateParaphrase => "update_paraphrase",
        /// [`MassMoveParaphrases`].
        MassMoveParaphrases => "mass_move_paraphrases",
        /// [`SuggestedItems`] for documents.
        SuggestedDocuments => "suggested_documents",
        /// [`SuggestedItems`] for paraphrases.
        SuggestedParaphrases => "suggested_paraphrases",
        /// [`SuggestedCount`] for documents.
        SuggestedDocumentsCount => "suggested_documents_count",
        /// [`SuggestedCount`] for paraphrases.
        SuggestedParaphrasesCount => "suggested_paraphrases_count",
        /// [`SuggestedDocumentsValidate`].
        SuggestedDocumentsValidate => "suggested_documents_validate",
        /// [`SearchDocuments`].
        SearchDocuments => "search_documents",
        /// [`Query`].
        Query => "query",
        /// [`BatchQuery`].
        BatchQuery => "batch_query",
        /// [`Question`].
        Question => "question",
        /// [`CloseConversation`].
        CloseConversation => "close_conversation",
        /// [`GetConversations`].
        GetConversations => "get_conversations",
        /// [`DelayedDelivery`].
        DelayedDelivery => "delayed_delivery",
        /// [`Var`].
        Var => "var",
        /// [`ConversationsCountReport`].
        ConversationsCountReport => "conversations_count_report",
        /// [`OperatorsReport`].
        OperatorsReport => "operators_report",
    }
}

fn normalise<S: Schema + Serialize>(payload: &Value) -> Result<Value, RegistryError> {
    let record = validate::<S>(payload)?;
    serde_json::to_value(&record).map_err(|error| RegistryError::Serialise {
        message: error.to_string(),
    })
}

impl SchemaName {
    /// Every registered schema, in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        <Self as WireEnum>::VARIANTS
    }

    /// Stable wire name of the schema.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.as_str()
    }

    /// Validate `payload` against this schema and return the normalised
    /// record as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Invalid`] listing every violation.
    pub fn validate(self, payload: &Value) -> Result<Value, RegistryError> {
        match self {
            Self::UserCreate => normalise::<UserCreate>(payload),
            Self::UserUpdate => normalise::<UserUpdate>(payload),
            Self::ServiceCreate => normalise::<ServiceCreate>(payload),
            Self::ServicesGet => normalise::<ServicesGet>(payload),
            Self::ServiceIds => normalise::<ServiceIds>(payload),
            Self::ServiceGet => normalise::<ServiceGet>(payload),
            Self::ServiceDocumentsGet => normalise::<ServiceDocumentsGet>(payload),
            Self::ServicesValidations => normalise::<ServicesValidations>(payload),
            Self::UpdateServiceAttachment => normalise::<UpdateServiceAttachment>(payload),
            Self::GroupsList => normalise::<GroupsList>(payload),
            Self::ServiceTerm | Self::UserTerm => normalise::<TermPayload>(payload),
            Self::ServicePrompt => normalise::<ServicePrompt>(payload),
            Self::ServicePromptQa => normalise::<ServicePromptQa>(payload),
            Self::Document => normalise::<Document>(payload),
            Self::DocumentContext => normalise::<DocumentContext>(payload),
            Self::CreateDocument => normalise::<CreateDocument>(payload),
            Self::UpdateDocument => normalise::<UpdateDocument>(payload),
            Self::DocumentAttachment => normalise::<DocumentAttachment>(payload),
            Self::DocumentTags => normalise::<DocumentTags>(payload),
            Self::CreateParaphrase => normalise::<CreateParaphrase>(payload),
            Self::GetParaphrases => normalise::<GetParaphrases>(payload),
            Self::MassUpdateParaphrases => normalise::<MassUpdateParaphrases>(payload),
            Self::UpdateParaphrase => normalise::<UpdateParaphrase>(payload),
            Self::MassMoveParaphrases => normalise::<MassMoveParaphrases>(payload),
            Self::SuggestedDocuments | Self::SuggestedParaphrases => {
                normalise::<SuggestedItems>(payload)
            }
            Self::SuggestedDocumentsCount | Self::SuggestedParaphrasesCount => {
                normalise::<SuggestedCount>(payload)
            }
            Self::SuggestedDocumentsValidate => normalise::<SuggestedDocumentsValidate>(payload),
            Self::SearchDocuments => normalise::<SearchDocuments>(payload),
            Self::Query => normalise::<Query>(payload),
            Self::BatchQuery => normalise::<BatchQuery>(payload),
            Self::Question => normalise::<Question>(payload),
            Self::CloseConversation => normalise::<CloseConversation>(payload),
            Self::GetConversations => normalise::<GetConversations>(payload),
            Self::DelayedDelivery => normalise::<DelayedDelivery>(payload),
            Self::Var => normalise::<Var>(payload),
            Self::ConversationsCountReport => normalise::<ConversationsCountReport>(payload),
            Self::OperatorsReport => normalise::<OperatorsReport>(payload),
        }
    }
}

impl FromStr for SchemaName {
    type Err = RegistryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_wire(name).ok_or_else(|| RegistryError::UnknownSchema {
            name: name.to_owned(),
        })
    }
}

/// Validate `payload` against the schema registered as `name`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownSchema`] for an unregistered name and
/// [`RegistryError::Invalid`] when the payload violates the schema.
///
/// # Examples
/// ```
/// use kb_schemas::validate_named;
/// use serde_json::json;
///
/// let record = validate_named("var", &json!({ "name": " greeting ", "value": "hi" }))
///     .expect("valid var");
/// assert_eq!(record, json!({ "name": "greeting", "value": "hi" }));
/// ```
pub fn validate_named(name: &str, payload: &Value) -> Result<Value, RegistryError> {
    let schema: SchemaName = name.parse()?;
    let outcome = schema.validate(payload);
    match &outcome {
        Ok(_) => debug!(schema = %schema, "payload accepted"),
        Err(RegistryError::Invalid(errors)) => debug!(
            schema = %schema,
            violations = errors.violations().len(),
            "payload rejected"
        ),
        Err(error) => warn!(schema = %schema, %error, "payload could not be normalised"),
    }
    outcome
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::ViolationKind;

    #[rstest]
    fn names_are_unique_and_parse_back() {
        let mut names: Vec<_> = SchemaName::all().iter().map(|schema| schema.name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        for schema in SchemaName::all() {
            assert_eq!(schema.name().parse::<SchemaName>(), Ok(*schema));
        }
    }

    #[rstest]
    fn unknown_name_is_reported() {
        let err = validate_named("nope", &json!({})).expect_err("unknown schema");
        assert_eq!(
            err,
            RegistryError::UnknownSchema {
                name: "nope".to_owned()
            }
        );
    }

    #[rstest]
    fn violations_pass_through() {
        let err = validate_named("var", &json!({ "name": "greeting" })).expect_err("no value");
        let RegistryError::Invalid(errors) = err else {
            panic!("expected validation errors, got {err:?}");
        };
        assert_eq!(
            errors.find("value").map(|violation| violation.kind()),
            Some(ViolationKind::MissingRequiredField)
        );
    }

    #[rstest]
    #[case("user_term")]
    #[case("service_term")]
    fn term_schemas_share_a_shape(#[case] name: &str) {
        let record = validate_named(name, &json!({ "term": " pet " })).expect("valid term");
        assert_eq!(record, json!({ "term": "pet", "synonyms": [] }));
    }
}
