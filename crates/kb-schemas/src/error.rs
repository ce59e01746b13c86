//! Error types for payload validation.
//!
//! A failed validation is reported as a [`ValidationErrors`] value holding
//! every [`Violation`] found in the payload. Adapters turn it into a
//! transport response; [`ValidationErrors::to_problem`] produces the JSON
//! body shape shared with the rest of the API.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::path::FieldPath;

/// Stable machine-readable category of a single violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field is absent, null, or blank.
    MissingRequiredField,
    /// The field holds a JSON value of the wrong type.
    TypeMismatch,
    /// A numeric value, text length, or item count is outside its bounds.
    OutOfRange,
    /// The value is not a member of the field's closed value set.
    InvalidEnumValue,
    /// A timestamp, UUID, or pattern-constrained string is malformed.
    InvalidFormat,
    /// A record-level rule spanning several fields failed.
    CrossFieldViolation,
    /// A uniqueness rule over a collection failed.
    DuplicateValue,
}

impl ViolationKind {
    /// Wire representation of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::TypeMismatch => "type_mismatch",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::InvalidFormat => "invalid_format",
            Self::CrossFieldViolation => "cross_field_violation",
            Self::DuplicateValue => "duplicate_value",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    field: FieldPath,
    code: ViolationKind,
    message: String,
}

impl Violation {
    /// Describe a failed constraint at `field`.
    pub fn new(field: FieldPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            code: kind,
            message: message.into(),
        }
    }

    /// Dotted path of the offending field, e.g. `documents[1].question`.
    #[must_use]
    pub const fn field_path(&self) -> &FieldPath {
        &self.field
    }

    /// Category of the failure.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        self.code
    }

    /// Human-readable explanation.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

/// Every violation found while validating one payload.
///
/// ## Invariants
/// - Holds at least one violation; an empty collection never escapes
///   [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("payload failed validation with {} violation(s)", .violations.len())]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub(crate) const fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// The collected violations in discovery order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        self.violations.as_slice()
    }

    /// Look up the first violation reported for `path`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Violation> {
        self.violations
            .iter()
            .find(|violation| violation.field.as_str() == path)
    }

    /// Consume the collection and return the violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Render the error body handed to clients.
    ///
    /// # Examples
    /// ```
    /// use kb_schemas::{schemas::UserCreate, validate};
    /// use serde_json::json;
    ///
    /// let err = validate::<UserCreate>(&json!({})).expect_err("empty payload");
    /// let body = err.to_problem();
    /// assert_eq!(body["code"], "invalid_request");
    /// assert_eq!(body["details"]["violations"].as_array().map(Vec::len), Some(3));
    /// ```
    #[must_use]
    pub fn to_problem(&self) -> Value {
        json!({
            "code": "invalid_request",
            "message": self.to_string(),
            "details": { "violations": self.violations },
        })
    }
}

/// Errors returned by the named-schema entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// No schema is registered under the requested name.
    #[error("unknown schema '{name}'")]
    UnknownSchema {
        /// The name that was requested.
        name: String,
    },

    /// The payload did not satisfy the schema.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The normalised record could not be re-serialised.
    #[error("failed to serialise normalised record: {message}")]
    Serialise {
        /// Description of the serialisation failure.
        message: String,
    },
}
