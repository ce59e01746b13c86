//! Knowledge-base service payloads.

use pagination::{PageWindow, PaginationError, SortOrder};
use serde::Serialize;
use serde_json::{Map, Value};

use super::document::{Document, check_unique_documents};
use crate::canonical::{flag_as_int, round_to_cents};
use crate::error::ViolationKind;
use crate::record::{RecordReader, RecordRules, Schema};
use crate::rules::{
    BoolRule, Choice, CountRule, FlagRule, FloatRule, IntRule, ListOf, Nested, ObjectRule,
    TextRule,
};
use crate::wire_enum::wire_enum;

/// Score threshold applied to trainable services when none is supplied.
const DEFAULT_TRAINABLE_SCORE: f64 = 0.95;

wire_enum! {
    /// Language preset used for text processing.
    pub enum LanguagePreset {
        /// Russian.
        Ru => "ru",
        /// English.
        En => "en",
        /// Mixed-language content.
        Multilingual => "multilingual",
    }
}

wire_enum! {
    /// Expected length of incoming queries.
    pub enum QueryLength {
        /// Chosen per query.
        Auto => "auto",
        /// A few words.
        Short => "short",
        /// A sentence.
        Medium => "medium",
        /// Several sentences.
        Long => "long",
    }
}

wire_enum! {
    /// How queries are matched to documents.
    pub enum ProcessingMethod {
        /// Automatic matching.
        Auto => "auto",
        /// Operator-driven matching.
        Manual => "manual",
        /// Automatic with operator fallback.
        Hybrid => "hybrid",
    }
}

/// Request body for creating a knowledge-base service.
///
/// ## Invariants
/// - `max_trainable_score` is `0.0` whenever `trainable` is `false`.
/// - `document_id` values in `documents` are unique, and so are questions
///   compared case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "service switches are independent settings on the wire"
)]
pub struct ServiceCreate {
    /// Service name, at most 255 characters.
    pub name: String,
    /// Language preset.
    pub preset: LanguagePreset,
    /// Whether the model may learn from the service's data.
    pub trainable: bool,
    /// Upper learning threshold in `0.0..=1.0`.
    pub max_trainable_score: f64,
    /// Minimum edit distance between distinct phrases, `0..=10`.
    pub min_levenstein_distance: u64,
    /// Maximum confidence mode for identical phrases.
    pub max_conf_mode_for_ident_phs: bool,
    /// Query processing method.
    pub method: ProcessingMethod,
    /// Split queries on linguistic conjunctions.
    pub split_by_linguistic_conjunctions: bool,
    /// Tokenise text before matching.
    pub enable_tokenization: bool,
    /// Expected query length.
    pub query_length: QueryLength,
    /// Penalty for a language mismatch between query and answer.
    pub inequal_lang_penalty: f64,
    /// Skip content validation on creation.
    pub without_validation: bool,
    /// Correct text typed in the wrong keyboard layout.
    pub with_layout_correction: bool,
    /// Free-form extension settings.
    pub ext: Map<String, Value>,
    /// Initial documents.
    pub documents: Vec<Document>,
    /// Score as supplied, before rounding.
    #[serde(skip)]
    requested_score: f64,
}

impl Schema for ServiceCreate {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let name = fields.required("name", TextRule::non_blank().max_chars(255));
        let preset = fields.or("preset", Choice::<LanguagePreset>::of(), LanguagePreset::Ru);
        let trainable = fields.or("trainable", BoolRule, true);
        let max_trainable_score =
            fields.optional("max_trainable_score", FloatRule::unit_interval().unrounded());
        let min_levenstein_distance =
            fields.or("min_levenstein_distance", CountRule::between(0, 10), 3);
        let max_conf_mode_for_ident_phs = fields.or("max_conf_mode_for_ident_phs", BoolRule, false);
        let method = fields.or("method", Choice::<ProcessingMethod>::of(), ProcessingMethod::Auto);
        let split_by_linguistic_conjunctions =
            fields.or("split_by_linguistic_conjunctions", BoolRule, false);
        let enable_tokenization = fields.or("enable_tokenization", BoolRule, true);
        let query_length = fields.or("query_length", Choice::<QueryLength>::of(), QueryLength::Auto);
        let inequal_lang_penalty = fields.or("inequal_lang_penalty", FloatRule::unit_interval(), 0.0);
        let without_validation = fields.or("without_validation", BoolRule, false);
        let with_layout_correction = fields.or("with_layout_correction", BoolRule, true);
        let ext = fields.or_else("ext", ObjectRule, Map::new);
        let documents = fields.or_else("documents", ListOf::new(Nested::<Document>::of()), Vec::new);

        let trainable_flag = trainable?;
        let score = max_trainable_score?.unwrap_or(if trainable_flag {
            DEFAULT_TRAINABLE_SCORE
        } else {
            0.0
        });
        Some(Self {
            name: name?,
            preset: preset?,
            trainable: trainable_flag,
            max_trainable_score: round_to_cents(score),
            min_levenstein_distance: min_levenstein_distance?,
            max_conf_mode_for_ident_phs: max_conf_mode_for_ident_phs?,
            method: method?,
            split_by_linguistic_conjunctions: split_by_linguistic_conjunctions?,
            enable_tokenization: enable_tokenization?,
            query_length: query_length?,
            inequal_lang_penalty: inequal_lang_penalty?,
            without_validation: without_validation?,
            with_layout_correction: with_layout_correction?,
            ext: ext?,
            documents: documents?,
            requested_score: score,
        })
    }

    fn check(&self, rules: &mut RecordRules<'_>) {
        if !self.trainable && self.requested_score > 0.0 {
            rules.violation(
                "max_trainable_score",
                ViolationKind::CrossFieldViolation,
                "must be 0 when trainable is false",
            );
        }
        check_unique_documents(&self.documents, rules);
    }
}

/// Query parameters for listing services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicesGet {
    /// Number of services to skip.
    pub offset: u64,
    /// Number of services to return, `1..=10000`.
    pub count: u64,
    /// Field to sort on.
    pub sort_by: String,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl ServicesGet {
    /// The requested slice of the service list.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroLimit`] if `count` is zero, which a
    /// validated record never holds.
    pub const fn window(&self) -> Result<PageWindow, PaginationError> {
        PageWindow::new(self.offset, self.count)
    }
}

impl Schema for ServicesGet {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let offset = fields.or("offset", CountRule::non_negative(), 0);
        let count = fields.or("count", CountRule::between(1, 10_000), 9999);
        let sort_by = fields.or_else("sort_by", TextRule::non_blank(), || "id".to_owned());
        let sort_order = fields.or("sort_order", Choice::<SortOrder>::of(), SortOrder::Asc);
        Some(Self {
            offset: offset?,
            count: count?,
            sort_by: sort_by?,
            sort_order: sort_order?,
        })
    }
}

/// A list of service identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceIds {
    /// Service identifiers; may be empty.
    pub service_ids: Vec<i64>,
}

impl Schema for ServiceIds {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let service_ids = fields.or_else("service_ids", ListOf::new(IntRule::any()), Vec::new);
        Some(Self {
            service_ids: service_ids?,
        })
    }
}

/// Query parameters for fetching one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceGet {
    /// Include the document list.
    #[serde(serialize_with = "flag_as_int")]
    pub include_documents: bool,
    /// Include documents awaiting review.
    #[serde(serialize_with = "flag_as_int")]
    pub include_suggested: bool,
    /// Paraphrases returned per document, `1..=10000`.
    pub limit_paraphrases: u64,
}

impl Schema for ServiceGet {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let include_documents = fields.or("include_documents", FlagRule, false);
        let include_suggested = fields.or("include_suggested", FlagRule, false);
        let limit_paraphrases = fields.or("limit_paraphrases", CountRule::between(1, 10_000), 100);
        Some(Self {
            include_documents: include_documents?,
            include_suggested: include_suggested?,
            limit_paraphrases: limit_paraphrases?,
        })
    }
}

/// Query parameters for listing a service's documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDocumentsGet {
    /// Documents to skip, at most 100 000.
    pub offset: u64,
    /// Documents to return, `1..=10000`.
    pub count: u64,
    /// Field to sort on.
    pub sort_by: String,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Paraphrases returned per document.
    pub limit_paraphrases: u64,
    /// History entries returned per document.
    pub limit_history: u64,
    /// Include documents awaiting review.
    #[serde(serialize_with = "flag_as_int")]
    pub include_suggested: bool,
}

impl ServiceDocumentsGet {
    /// The requested slice of the document list.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroLimit`] if `count` is zero, which a
    /// validated record never holds.
    pub const fn window(&self) -> Result<PageWindow, PaginationError> {
        PageWindow::new(self.offset, self.count)
    }
}

impl Schema for ServiceDocumentsGet {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let offset = fields.or("offset", CountRule::between(0, 100_000), 0);
        let count = fields.or("count", CountRule::between(1, 10_000), 1000);
        let sort_by = fields.or_else("sort_by", TextRule::non_blank(), || "id".to_owned());
        let sort_order = fields.or("sort_order", Choice::<SortOrder>::of(), SortOrder::Asc);
        let limit_paraphrases =
            fields.or("limit_paraphrases", CountRule::between(0, 1_000_000), 500_000);
        let limit_history = fields.or("limit_history", CountRule::between(1, 10_000), 100);
        let include_suggested = fields.or("include_suggested", FlagRule, false);
        Some(Self {
            offset: offset?,
            count: count?,
            sort_by: sort_by?,
            sort_order: sort_order?,
            limit_paraphrases: limit_paraphrases?,
            limit_history: limit_history?,
            include_suggested: include_suggested?,
        })
    }
}

/// Request body for validating the content of several services.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicesValidations {
    /// Services to check; at least one.
    pub service_ids: Vec<i64>,
    /// Minimum overall confidence.
    pub min_confidence: f64,
    /// Minimum confidence for answers.
    pub min_answer_confidence: f64,
}

impl Schema for ServicesValidations {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let service_ids = fields.required("service_ids", ListOf::new(IntRule::any()).non_empty());
        let min_confidence = fields.or("min_confidence", FloatRule::unit_interval(), 0.95);
        let min_answer_confidence =
            fields.or("min_answer_confidence", FloatRule::unit_interval(), 0.9);
        Some(Self {
            service_ids: service_ids?,
            min_confidence: min_confidence?,
            min_answer_confidence: min_answer_confidence?,
        })
    }
}

/// Request body for updating a service attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateServiceAttachment {
    /// Attachment name.
    pub name: String,
    /// Description, at most 1000 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema for UpdateServiceAttachment {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let name = fields.required("name", TextRule::non_blank().max_chars(255));
        let description = fields.optional("description", TextRule::text().max_chars(1000));
        Some(Self {
            name: name?,
            description: description?,
        })
    }
}

/// Request body for grouping services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupsList {
    /// Services to place in the group.
    pub services: Vec<i64>,
}

impl Schema for GroupsList {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let services = fields.required("services", ListOf::new(IntRule::any()));
        Some(Self {
            services: services?,
        })
    }
}

/// A term with its synonyms, for service and user dictionaries alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermPayload {
    /// The main term.
    pub term: String,
    /// Synonyms of the term.
    pub synonyms: Vec<String>,
}

impl Schema for TermPayload {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let term = fields.required("term", TextRule::non_blank().max_chars(255));
        let synonyms = fields.or_else("synonyms", ListOf::new(TextRule::text()), Vec::new);
        Some(Self {
            term: term?,
            synonyms: synonyms?,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Covers service defaults and record-level rules.

    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::validate;

    fn document(id: u64, question: &str) -> Value {
        json!({
            "document_id": id,
            "name": "doc",
            "question": question,
            "answer": "answer",
            "status": "OK",
            "modified_at": "2024-01-02T03:04:05Z",
        })
    }

    #[rstest]
    fn service_defaults_apply() {
        let service = validate::<ServiceCreate>(&json!({ "name": "Pets" })).expect("valid");
        assert_eq!(service.preset, LanguagePreset::Ru);
        assert!(service.trainable);
        assert_eq!(service.max_trainable_score, 0.95);
        assert_eq!(service.min_levenstein_distance, 3);
        assert_eq!(service.method, ProcessingMethod::Auto);
        assert_eq!(service.query_length, QueryLength::Auto);
        assert!(service.with_layout_correction);
        assert!(service.documents.is_empty());
    }

    #[rstest]
    fn untrainable_service_defaults_score_to_zero() {
        let service = validate::<ServiceCreate>(&json!({ "name": "Pets", "trainable": false }))
            .expect("valid");
        assert_eq!(service.max_trainable_score, 0.0);
    }

    #[rstest]
    #[case(false, 0.4, false)]
    #[case(true, 0.4, true)]
    #[case(false, 0.0, true)]
    #[case(false, 0.004, false)]
    #[case(true, 0.004, true)]
    fn trainable_score_rule(#[case] trainable: bool, #[case] score: f64, #[case] accepted: bool) {
        let outcome = validate::<ServiceCreate>(&json!({
            "name": "Pets",
            "trainable": trainable,
            "max_trainable_score": score,
        }));
        match outcome {
            Ok(service) => {
                assert!(accepted);
                assert!(service.max_trainable_score <= score);
            }
            Err(err) => {
                assert!(!accepted);
                let violation = err.find("max_trainable_score").expect("score violation");
                assert_eq!(violation.kind(), ViolationKind::CrossFieldViolation);
            }
        }
    }

    #[rstest]
    fn invalid_trainable_suppresses_score_rule() {
        let err = validate::<ServiceCreate>(&json!({
            "name": "Pets",
            "trainable": "sometimes",
            "max_trainable_score": 0.4,
        }))
        .expect_err("invalid trainable");
        assert_eq!(err.violations().len(), 1);
        assert_eq!(
            err.find("trainable").map(|violation| violation.kind()),
            Some(ViolationKind::TypeMismatch)
        );
    }

    #[rstest]
    fn duplicate_document_ids_are_rejected() {
        let err = validate::<ServiceCreate>(&json!({
            "name": "Pets",
            "documents": [document(1, "dogs?"), document(1, "cats?")],
        }))
        .expect_err("duplicate ids");
        let violation = err.find("documents[1].document_id").expect("duplicate id");
        assert_eq!(violation.kind(), ViolationKind::DuplicateValue);
    }

    #[rstest]
    fn questions_are_unique_ignoring_case_and_padding() {
        let err = validate::<ServiceCreate>(&json!({
            "name": "Pets",
            "documents": [
                document(1, "How do I buy a dog?"),
                document(2, "cats?"),
                document(3, "  how do i BUY a dog?  "),
            ],
        }))
        .expect_err("duplicate questions");
        assert_eq!(err.violations().len(), 1);
        let violation = err.find("documents[2].question").expect("duplicate question");
        assert_eq!(violation.kind(), ViolationKind::DuplicateValue);
        assert_eq!(violation.message(), "question duplicates documents[0]");
    }

    #[rstest]
    fn invalid_document_skips_uniqueness_rules() {
        let err = validate::<ServiceCreate>(&json!({
            "name": "Pets",
            "documents": [document(1, "dogs?"), document(1, " ")],
        }))
        .expect_err("blank question");
        assert_eq!(err.violations().len(), 1);
        assert!(err.find("documents[1].question").is_some());
    }

    #[rstest]
    fn list_parameters_default_and_window() {
        let params = validate::<ServicesGet>(&json!({ "offset": "20" })).expect("valid");
        assert_eq!(params.count, 9999);
        assert_eq!(params.sort_by, "id");
        assert_eq!(params.sort_order, SortOrder::Asc);
        let window = params.window().expect("positive count");
        assert_eq!((window.offset(), window.limit()), (20, 9999));
    }

    #[rstest]
    #[case(json!({ "count": 0 }), "count")]
    #[case(json!({ "count": 10_001 }), "count")]
    #[case(json!({ "offset": 100_001 }), "offset")]
    #[case(json!({ "limit_history": 0 }), "limit_history")]
    fn document_listing_bounds(#[case] params: Value, #[case] field: &str) {
        let err = validate::<ServiceDocumentsGet>(&params).expect_err("out of range");
        assert_eq!(
            err.find(field).map(|violation| violation.kind()),
            Some(ViolationKind::OutOfRange)
        );
    }

    #[rstest]
    fn flags_serialise_as_integers() {
        let params = validate::<ServiceGet>(&json!({ "include_documents": "1" })).expect("valid");
        assert!(params.include_documents);
        assert_eq!(
            serde_json::to_value(&params).expect("serialise"),
            json!({ "include_documents": 1, "include_suggested": 0, "limit_paraphrases": 100 })
        );
    }

    #[rstest]
    fn validations_need_a_service_and_round_thresholds() {
        let err = validate::<ServicesValidations>(&json!({ "service_ids": [] }))
            .expect_err("empty list");
        assert!(err.find("service_ids").is_some());

        let checked = validate::<ServicesValidations>(&json!({
            "service_ids": [4],
            "min_confidence": 0.876,
        }))
        .expect("valid");
        assert_eq!(checked.min_confidence, 0.88);
        assert_eq!(checked.min_answer_confidence, 0.9);
    }
}
