//! Two-phase record validation.
//!
//! Phase one reads every declared field through a [`RecordReader`], which
//! applies the field's [`FieldRule`] and keeps going after a failure so a
//! single request reports every invalid field. Phase two runs the record's
//! [`Schema::check`] over the fully typed value, and only when phase one
//! succeeded, so a field that is already invalid never produces a second,
//! misleading cross-field violation.

use pagination::AliasPair;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{ValidationErrors, ViolationKind};
use crate::path::FieldPath;
use crate::rules::{FieldRule, Nested, Violations};

/// A payload record with declared field constraints.
pub trait Schema: Sized {
    /// Read and check every field. Returns `None` when any field failed;
    /// the failures are already reported through `fields`.
    fn read(fields: &mut RecordReader<'_>) -> Option<Self>;

    /// Record-level rules over the typed record.
    fn check(&self, _rules: &mut RecordRules<'_>) {}
}

/// Field-by-field access to one JSON object.
pub struct RecordReader<'a> {
    object: &'a Map<String, Value>,
    path: &'a FieldPath,
    sink: &'a mut Violations,
}

impl<'a> RecordReader<'a> {
    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name).filter(|value| !value.is_null())
    }

    /// A field that must be present and non-null.
    pub fn required<R: FieldRule>(&mut self, name: &str, rule: R) -> Option<R::Output> {
        let path = self.path.child(name);
        if let Some(value) = self.lookup(name) {
            rule.apply(value, &path, self.sink)
        } else {
            self.sink.report(
                &path,
                ViolationKind::MissingRequiredField,
                "field is required",
            );
            None
        }
    }

    /// A field that may be absent or null.
    ///
    /// The outer `Option` is `None` when the field is present but invalid.
    pub fn optional<R: FieldRule>(&mut self, name: &str, rule: R) -> Option<Option<R::Output>> {
        let path = self.path.child(name);
        self.lookup(name)
            .map_or(Some(None), |value| rule.apply(value, &path, self.sink).map(Some))
    }

    /// A field with a default that applies only when it is absent.
    pub fn or<R: FieldRule>(&mut self, name: &str, rule: R, default: R::Output) -> Option<R::Output> {
        self.optional(name, rule)
            .map(|value| value.unwrap_or(default))
    }

    /// Like [`RecordReader::or`] with a lazily built default.
    pub fn or_else<R, F>(&mut self, name: &str, rule: R, default: F) -> Option<R::Output>
    where
        R: FieldRule,
        F: FnOnce() -> R::Output,
    {
        self.optional(name, rule)
            .map(|value| value.unwrap_or_else(default))
    }

    /// A parameter that may be supplied under its canonical name or an alias.
    ///
    /// Both names are checked; resolution is left to the caller through
    /// [`AliasPair`], where the canonical name wins.
    pub fn aliased<R: FieldRule>(
        &mut self,
        canonical: &str,
        alias: &str,
        rule: R,
    ) -> Option<AliasPair<R::Output>> {
        let canonical_value = self.optional(canonical, rule);
        let alias_value = self.optional(alias, rule);
        Some(AliasPair::new(canonical_value?, alias_value?))
    }
}

/// Reporting surface for record-level rules.
pub struct RecordRules<'a> {
    path: &'a FieldPath,
    sink: &'a mut Violations,
}

impl RecordRules<'_> {
    /// Path of the record being checked.
    #[must_use]
    pub const fn path(&self) -> &FieldPath {
        self.path
    }

    /// Report a violation against the member `field` of this record.
    pub fn violation(&mut self, field: &str, kind: ViolationKind, message: impl Into<String>) {
        let path = self.path.child(field);
        self.sink.report(&path, kind, message);
    }

    /// Report a violation at an arbitrary path below this record.
    pub fn violation_at(&mut self, path: &FieldPath, kind: ViolationKind, message: impl Into<String>) {
        self.sink.report(path, kind, message);
    }
}

/// Read `object` as record `S` at `path`, running both phases.
pub(crate) fn read_record<S: Schema>(
    object: &Map<String, Value>,
    path: &FieldPath,
    sink: &mut Violations,
) -> Option<S> {
    let mut reader = RecordReader {
        object,
        path,
        sink: &mut *sink,
    };
    let record = S::read(&mut reader)?;
    let before = sink.len();
    record.check(&mut RecordRules {
        path,
        sink: &mut *sink,
    });
    let accepted = sink.len() == before;
    if !accepted {
        trace!(path = %path, "record-level rule rejected record");
    }
    accepted.then_some(record)
}

/// Validate an untyped payload as record `S`.
///
/// On success the returned record is fully normalised: text trimmed,
/// thresholds rounded, and timestamps converted to UTC.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every violation found.
///
/// # Examples
/// ```
/// use kb_schemas::{schemas::ServiceCreate, validate};
/// use serde_json::json;
///
/// let service = validate::<ServiceCreate>(&json!({
///     "name": "  Pets  ",
///     "inequal_lang_penalty": 0.333,
/// }))
/// .expect("valid service");
/// assert_eq!(service.name, "Pets");
/// assert_eq!(service.inequal_lang_penalty, 0.33);
/// ```
pub fn validate<S: Schema>(payload: &Value) -> Result<S, ValidationErrors> {
    let root = FieldPath::root();
    let mut sink = Violations::default();
    let record = Nested::<S>::of().apply(payload, &root, &mut sink);
    sink.finish(record)
}
