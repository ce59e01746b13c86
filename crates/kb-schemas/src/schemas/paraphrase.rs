//! Paraphrase payloads.

use pagination::{PageWindow, PaginationError, ParamSource, SortOrder};
use serde::Serialize;

use super::sorting::SortField;
use crate::error::ViolationKind;
use crate::record::{RecordReader, RecordRules, Schema};
use crate::rules::{Choice, CountRule, ListOf, Nested, TextRule};

const TEXT: TextRule = TextRule::non_blank().max_chars(5000);
const AUTHOR: TextRule = TextRule::non_blank().max_chars(255);

/// Limit applied when neither `limit_paraphrases` nor `count` is supplied.
const DEFAULT_PARAPHRASE_LIMIT: u64 = 9999;

/// Request body for adding a paraphrase to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateParaphrase {
    /// Owning service.
    pub service_id: u64,
    /// Target document.
    pub document_id: u64,
    /// The rewording, at most 5000 characters.
    pub paraphrase: String,
    /// Author, at most 255 characters.
    pub author: String,
}

impl Schema for CreateParaphrase {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let service_id = fields.required("service_id", CountRule::positive());
        let document_id = fields.required("document_id", CountRule::positive());
        let paraphrase = fields.required("paraphrase", TEXT);
        let author = fields.required("author", AUTHOR);
        Some(Self {
            service_id: service_id?,
            document_id: document_id?,
            paraphrase: paraphrase?,
            author: author?,
        })
    }
}

/// Query parameters for listing a document's paraphrases.
///
/// `count` and `offset` are public aliases of `limit_paraphrases` and
/// `offset_paraphrases`. The canonical name wins when both are supplied;
/// the record keeps only the resolved values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetParaphrases {
    /// Document whose paraphrases are listed.
    pub document_id: u64,
    /// Resolved page size.
    pub limit_paraphrases: u64,
    /// Resolved number of paraphrases to skip.
    pub offset_paraphrases: u64,
    /// Sort key.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
    #[serde(skip)]
    limit_source: ParamSource,
}

impl GetParaphrases {
    /// Which parameter name supplied the page size.
    #[must_use]
    pub const fn limit_source(&self) -> ParamSource {
        self.limit_source
    }

    /// The requested slice of the paraphrase list.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroLimit`] if the limit is zero, which a
    /// validated record never holds.
    pub const fn window(&self) -> Result<PageWindow, PaginationError> {
        PageWindow::new(self.offset_paraphrases, self.limit_paraphrases)
    }
}

impl Schema for GetParaphrases {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let document_id = fields.required("document_id", CountRule::positive());
        let limit = fields.aliased("limit_paraphrases", "count", CountRule::positive());
        let offset = fields.aliased("offset_paraphrases", "offset", CountRule::non_negative());
        let sort_by = fields.or("sort_by", Choice::<SortField>::of(), SortField::Id);
        let sort_order = fields.or("sort_order", Choice::<SortOrder>::of(), SortOrder::Asc);

        let limit_paraphrases = limit?.resolve_or(DEFAULT_PARAPHRASE_LIMIT);
        Some(Self {
            document_id: document_id?,
            limit_paraphrases: limit_paraphrases.value(),
            offset_paraphrases: offset?.resolve_or(0).value(),
            sort_by: sort_by?,
            sort_order: sort_order?,
            limit_source: limit_paraphrases.source(),
        })
    }
}

/// One paraphrase in a bulk edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParaphraseEdit {
    /// Paraphrase to edit.
    pub paraphrase_id: u64,
    /// New text.
    pub text: String,
    /// Author of the edit.
    pub author: String,
}

impl Schema for ParaphraseEdit {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let paraphrase_id = fields.required("paraphrase_id", CountRule::positive());
        let text = fields.required("text", TEXT);
        let author = fields.required("author", AUTHOR);
        Some(Self {
            paraphrase_id: paraphrase_id?,
            text: text?,
            author: author?,
        })
    }
}

/// Request body for editing several paraphrases at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MassUpdateParaphrases {
    /// The edits; at least one.
    pub paraphrases: Vec<ParaphraseEdit>,
}

impl Schema for MassUpdateParaphrases {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let paraphrases = fields.required(
            "paraphrases",
            ListOf::new(Nested::<ParaphraseEdit>::of()).non_empty(),
        );
        Some(Self {
            paraphrases: paraphrases?,
        })
    }
}

/// Request body for editing one paraphrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateParaphrase {
    /// New text.
    pub text: String,
    /// Author of the edit.
    pub author: String,
}

impl Schema for UpdateParaphrase {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let text = fields.required("text", TEXT);
        let author = fields.required("author", AUTHOR);
        Some(Self {
            text: text?,
            author: author?,
        })
    }
}

/// One paraphrase moved to another document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParaphraseMove {
    /// Paraphrase to move.
    pub paraphrase_id: u64,
    /// Its text.
    pub text: String,
    /// Current document.
    pub document_id: u64,
    /// Destination document; differs from `document_id`.
    pub target_document_id: u64,
}

impl Schema for ParaphraseMove {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let paraphrase_id = fields.required("paraphrase_id", CountRule::positive());
        let text = fields.required("text", TEXT);
        let document_id = fields.required("document_id", CountRule::positive());
        let target_document_id = fields.required("target_document_id", CountRule::positive());
        Some(Self {
            paraphrase_id: paraphrase_id?,
            text: text?,
            document_id: document_id?,
            target_document_id: target_document_id?,
        })
    }

    fn check(&self, rules: &mut RecordRules<'_>) {
        if self.target_document_id == self.document_id {
            rules.violation(
                "target_document_id",
                ViolationKind::CrossFieldViolation,
                "must differ from document_id",
            );
        }
    }
}

/// Request body for moving several paraphrases between documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MassMoveParaphrases {
    /// The moves; at least one.
    pub paraphrases: Vec<ParaphraseMove>,
}

impl Schema for MassMoveParaphrases {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let paraphrases = fields.required(
            "paraphrases",
            ListOf::new(Nested::<ParaphraseMove>::of()).non_empty(),
        );
        Some(Self {
            paraphrases: paraphrases?,
        })
    }
}
