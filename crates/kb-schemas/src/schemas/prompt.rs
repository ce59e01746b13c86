//! Generative prompt configuration of a service.

use serde::Serialize;

use crate::record::{RecordReader, Schema};
use crate::rules::{BoolRule, Choice, CountRule, ListOf, Nested, TextRule};
use crate::wire_enum::wire_enum;

wire_enum! {
    /// Role of a question/answer pair in the prompt.
    pub enum QaType {
        /// An example answered directly.
        Standard => "standard",
        /// An example that asks the user to clarify.
        Clarifying => "clarifying",
    }
}

/// One instruction in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guideline {
    /// Guideline identifier.
    pub id: u64,
    /// Instruction text.
    pub text: String,
}

impl Schema for Guideline {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let id = fields.required("id", CountRule::non_negative());
        let text = fields.required("text", TextRule::non_blank());
        Some(Self {
            id: id?,
            text: text?,
        })
    }
}

/// One example question/answer pair in the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaItem {
    /// Pair identifier.
    pub id: u64,
    /// Role of the pair.
    #[serde(rename = "type")]
    pub kind: QaType,
    /// Example question.
    pub question: String,
    /// Example answer.
    pub answer: String,
}

impl Schema for QaItem {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let id = fields.required("id", CountRule::non_negative());
        let kind = fields.required("type", Choice::<QaType>::of());
        let question = fields.required("question", TextRule::non_blank());
        let answer = fields.required("answer", TextRule::non_blank());
        Some(Self {
            id: id?,
            kind: kind?,
            question: question?,
            answer: answer?,
        })
    }
}

/// Which prompt sections are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each switch maps to one independent prompt section"
)]
pub struct EnabledParts {
    /// The heading.
    pub heading: bool,
    /// The guideline list.
    pub guidelines: bool,
    /// Standard examples.
    pub standard_qa: bool,
    /// Clarifying examples.
    pub clarifying_qa: bool,
}

impl Schema for EnabledParts {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let heading = fields.required("heading", BoolRule);
        let guidelines = fields.required("guidelines", BoolRule);
        let standard_qa = fields.required("standard_qa", BoolRule);
        let clarifying_qa = fields.required("clarifying_qa", BoolRule);
        Some(Self {
            heading: heading?,
            guidelines: guidelines?,
            standard_qa: standard_qa?,
            clarifying_qa: clarifying_qa?,
        })
    }
}

/// Request body replacing a service's prompt. Omitted sections are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePrompt {
    /// Heading text, at most 1000 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    /// Instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<Vec<Guideline>>,
    /// Example pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qa: Option<Vec<QaItem>>,
    /// Section switches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_parts: Option<EnabledParts>,
}

impl Schema for ServicePrompt {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let heading = fields.optional("heading", TextRule::text().max_chars(1000));
        let guidelines = fields.optional("guidelines", ListOf::new(Nested::<Guideline>::of()));
        let qa = fields.optional("qa", ListOf::new(Nested::<QaItem>::of()));
        let enabled_parts = fields.optional("enabled_parts", Nested::<EnabledParts>::of());
        Some(Self {
            heading: heading?,
            guidelines: guidelines?,
            qa: qa?,
            enabled_parts: enabled_parts?,
        })
    }
}

/// Request body adding or editing one example pair; `id` 0 creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePromptQa {
    /// Pair identifier, 0 for a new pair.
    pub id: u64,
    /// Role of the pair.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<QaType>,
    /// Example question, at most 5000 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Example answer, at most 10 000 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl Schema for ServicePromptQa {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let id = fields.or("id", CountRule::non_negative(), 0);
        let kind = fields.optional("type", Choice::<QaType>::of());
        let question = fields.optional("question", TextRule::non_blank().max_chars(5000));
        let answer = fields.optional("answer", TextRule::non_blank().max_chars(10_000));
        Some(Self {
            id: id?,
            kind: kind?,
            question: question?,
            answer: answer?,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::{ViolationKind, validate};

    #[rstest]
    fn prompt_sections_are_optional() {
        let prompt = validate::<ServicePrompt>(&json!({ "heading": "  Be brief.  " }))
            .expect("valid prompt");
        assert_eq!(prompt.heading.as_deref(), Some("Be brief."));
        assert!(prompt.qa.is_none());
        assert!(prompt.enabled_parts.is_none());
    }

    #[rstest]
    fn enabled_parts_require_every_switch() {
        let err = validate::<ServicePrompt>(&json!({
            "enabled_parts": { "heading": true, "guidelines": false },
        }))
        .expect_err("partial switches");
        let paths: Vec<_> = err
            .violations()
            .iter()
            .map(|violation| violation.field_path().as_str())
            .collect();
        assert_eq!(
            paths,
            vec!["enabled_parts.standard_qa", "enabled_parts.clarifying_qa"]
        );
    }

    #[rstest]
    fn qa_type_is_renamed_on_the_wire() {
        let prompt = validate::<ServicePrompt>(&json!({
            "qa": [{ "id": 0, "type": "clarifying", "question": "Which pet?", "answer": "Say which." }],
        }))
        .expect("valid prompt");
        let serialised = serde_json::to_value(&prompt).expect("serialise");
        assert_eq!(serialised["qa"][0]["type"], "clarifying");
    }

    #[rstest]
    fn new_pair_defaults_to_id_zero() {
        let pair = validate::<ServicePromptQa>(&json!({ "question": "Which pet?" }))
            .expect("valid pair");
        assert_eq!(pair.id, 0);
        assert!(pair.kind.is_none());

        let err = validate::<ServicePromptQa>(&json!({ "type": "rhetorical" }))
            .expect_err("unknown type");
        assert_eq!(
            err.find("type").map(|violation| violation.kind()),
            Some(ViolationKind::InvalidEnumValue)
        );
    }
}
