//! Declarative field constraints.
//!
//! Each rule coerces a raw JSON value to its typed output and checks the
//! declared bounds, reporting at most one [`Violation`] for the field.
//! Coercion always runs before bound checks. Rules are small `Copy` values
//! so schemas can spell their constraint tables inline.

use std::marker::PhantomData;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::canonical::{Timestamp, round_to_cents};
use crate::error::{ValidationErrors, Violation, ViolationKind};
use crate::path::FieldPath;
use crate::record::{Schema, read_record};
use crate::wire_enum::WireEnum;

/// Accumulates violations for one payload.
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Record a failed constraint at `path`.
    pub fn report(&mut self, path: &FieldPath, kind: ViolationKind, message: impl Into<String>) {
        self.0.push(Violation::new(path.clone(), kind, message));
    }

    /// Number of violations recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Turn the collected state into the validation outcome.
    pub(crate) fn finish<T>(mut self, record: Option<T>) -> Result<T, ValidationErrors> {
        match record {
            Some(value) if self.0.is_empty() => Ok(value),
            Some(_) | None => {
                if self.0.is_empty() {
                    self.report(
                        &FieldPath::root(),
                        ViolationKind::CrossFieldViolation,
                        "payload was rejected",
                    );
                }
                Err(ValidationErrors::new(self.0))
            }
        }
    }
}

/// A constraint applied to one present, non-null field value.
pub trait FieldRule: Copy {
    /// Typed value produced when the constraint holds.
    type Output;

    /// Coerce and check `value`, reporting a violation at `path` on failure.
    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations)
    -> Option<Self::Output>;
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn mismatch(path: &FieldPath, sink: &mut Violations, expected: &str, value: &Value) {
    sink.report(
        path,
        ViolationKind::TypeMismatch,
        format!("expected {expected}, found {}", json_type(value)),
    );
}

/// A regular expression a text field must match in full.
#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    regex: fn() -> &'static Regex,
    describe: &'static str,
}

impl Pattern {
    /// Pair a lazily compiled expression with a human description.
    #[must_use]
    pub const fn new(regex: fn() -> &'static Regex, describe: &'static str) -> Self {
        Self { regex, describe }
    }

    fn is_match(&self, text: &str) -> bool {
        (self.regex)().is_match(text)
    }
}

static CLOCK_TIME_RE: OnceLock<Regex> = OnceLock::new();

fn clock_time_regex() -> &'static Regex {
    CLOCK_TIME_RE.get_or_init(|| {
        let pattern = r"^([01]?[0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("clock time regex failed to compile: {error}"))
    })
}

/// `HH:MM:SS` wall-clock time; the hour may be a single digit.
pub const CLOCK_TIME: Pattern = Pattern::new(clock_time_regex, "a HH:MM:SS time");

/// String constraint.
///
/// Lengths are counted in Unicode scalar values after trimming. A blank
/// value in a non-blank field is reported as a missing field rather than a
/// length violation.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    trim: bool,
    non_blank: bool,
    min_chars: Option<usize>,
    max_chars: Option<usize>,
    pattern: Option<Pattern>,
}

impl TextRule {
    /// Trimmed free text without bounds.
    #[must_use]
    pub const fn text() -> Self {
        Self {
            trim: true,
            non_blank: false,
            min_chars: None,
            max_chars: None,
            pattern: None,
        }
    }

    /// Trimmed free text that must not be empty after trimming.
    #[must_use]
    pub const fn non_blank() -> Self {
        Self {
            non_blank: true,
            ..Self::text()
        }
    }

    /// Untrimmed text, for secrets and opaque tokens.
    #[must_use]
    pub const fn verbatim() -> Self {
        Self {
            trim: false,
            ..Self::text()
        }
    }

    /// Require at least `min` characters.
    #[must_use]
    pub const fn min_chars(self, min: usize) -> Self {
        Self {
            min_chars: Some(min),
            ..self
        }
    }

    /// Allow at most `max` characters.
    #[must_use]
    pub const fn max_chars(self, max: usize) -> Self {
        Self {
            max_chars: Some(max),
            ..self
        }
    }

    /// Require between `min` and `max` characters inclusive.
    #[must_use]
    pub const fn chars(self, min: usize, max: usize) -> Self {
        self.min_chars(min).max_chars(max)
    }

    /// Require the text to match `pattern`.
    #[must_use]
    pub const fn pattern(self, pattern: Pattern) -> Self {
        Self {
            pattern: Some(pattern),
            ..self
        }
    }
}

impl FieldRule for TextRule {
    type Output = String;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<String> {
        let Some(raw) = value.as_str() else {
            mismatch(path, sink, "a string", value);
            return None;
        };
        let text = if self.trim { raw.trim() } else { raw };
        if self.non_blank && text.trim().is_empty() {
            sink.report(path, ViolationKind::MissingRequiredField, "must not be blank");
            return None;
        }
        let length = text.chars().count();
        if let Some(min) = self.min_chars.filter(|min| length < *min) {
            sink.report(
                path,
                ViolationKind::OutOfRange,
                format!("must be at least {min} characters"),
            );
            return None;
        }
        if let Some(max) = self.max_chars.filter(|max| length > *max) {
            sink.report(
                path,
                ViolationKind::OutOfRange,
                format!("must be at most {max} characters"),
            );
            return None;
        }
        if let Some(pattern) = self.pattern.filter(|pattern| !pattern.is_match(text)) {
            sink.report(
                path,
                ViolationKind::InvalidFormat,
                format!("must be {}", pattern.describe),
            );
            return None;
        }
        Some(text.to_owned())
    }
}

fn coerce_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from))
            .or_else(|| {
                // Whole floats print without a fraction, e.g. `2.0` as `2`.
                number
                    .as_f64()
                    .and_then(|float| float.to_string().parse::<i128>().ok())
            }),
        Value::String(raw) => raw.trim().parse::<i128>().ok(),
        _ => None,
    }
}

fn check_integer_bounds(
    number: i128,
    min: Option<i128>,
    max: Option<i128>,
    path: &FieldPath,
    sink: &mut Violations,
) -> Option<i128> {
    if let Some(lower) = min.filter(|lower| number < *lower) {
        sink.report(
            path,
            ViolationKind::OutOfRange,
            format!("must be greater than or equal to {lower}"),
        );
        return None;
    }
    if let Some(upper) = max.filter(|upper| number > *upper) {
        sink.report(
            path,
            ViolationKind::OutOfRange,
            format!("must be less than or equal to {upper}"),
        );
        return None;
    }
    Some(number)
}

fn read_integer(value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<i128> {
    let coerced = coerce_integer(value);
    if coerced.is_none() {
        mismatch(path, sink, "an integer", value);
    }
    coerced
}

/// Signed integer constraint with inclusive bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntRule {
    min: Option<i64>,
    max: Option<i64>,
}

impl IntRule {
    /// Any 64-bit signed integer.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl FieldRule for IntRule {
    type Output = i64;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<i64> {
        let number = read_integer(value, path, sink)?;
        let min = self.min.map(i128::from).or(Some(i128::from(i64::MIN)));
        let max = self.max.map(i128::from).or(Some(i128::from(i64::MAX)));
        let checked = check_integer_bounds(number, min, max, path, sink)?;
        i64::try_from(checked).ok()
    }
}

/// Non-negative integer constraint for ids, counts, offsets and limits.
#[derive(Debug, Clone, Copy)]
pub struct CountRule {
    min: u64,
    max: Option<u64>,
}

impl CountRule {
    /// Any value `>= min`.
    #[must_use]
    pub const fn at_least(min: u64) -> Self {
        Self { min, max: None }
    }

    /// Any value `>= 0`.
    #[must_use]
    pub const fn non_negative() -> Self {
        Self::at_least(0)
    }

    /// Any value `>= 1`.
    #[must_use]
    pub const fn positive() -> Self {
        Self::at_least(1)
    }

    /// Any value in `min..=max`.
    #[must_use]
    pub const fn between(min: u64, max: u64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }
}

impl FieldRule for CountRule {
    type Output = u64;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<u64> {
        let number = read_integer(value, path, sink)?;
        let max = self.max.unwrap_or(u64::MAX);
        let checked = check_integer_bounds(
            number,
            Some(i128::from(self.min)),
            Some(i128::from(max)),
            path,
            sink,
        )?;
        u64::try_from(checked).ok()
    }
}

/// A 0/1 integer switch, read as a boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagRule;

impl FieldRule for FlagRule {
    type Output = bool;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<bool> {
        CountRule::between(0, 1)
            .apply(value, path, sink)
            .map(|flag| flag == 1)
    }
}

/// Floating point constraint with inclusive bounds.
#[derive(Debug, Clone, Copy)]
pub struct FloatRule {
    min: Option<f64>,
    max: Option<f64>,
    round: bool,
}

impl FloatRule {
    /// A fixed-point threshold in `0.0..=1.0`, rounded to two places.
    #[must_use]
    pub const fn unit_interval() -> Self {
        Self {
            min: Some(0.0),
            max: Some(1.0),
            round: true,
        }
    }

    /// Keep the value as supplied, for record-level rules that must see it
    /// before rounding.
    #[must_use]
    pub const fn unrounded(self) -> Self {
        Self {
            round: false,
            ..self
        }
    }
}

impl FieldRule for FloatRule {
    type Output = f64;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<f64> {
        let coerced = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => raw.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(number) = coerced.filter(|number| number.is_finite()) else {
            mismatch(path, sink, "a finite number", value);
            return None;
        };
        if let Some(lower) = self.min.filter(|lower| number < *lower) {
            sink.report(
                path,
                ViolationKind::OutOfRange,
                format!("must be greater than or equal to {lower}"),
            );
            return None;
        }
        if let Some(upper) = self.max.filter(|upper| number > *upper) {
            sink.report(
                path,
                ViolationKind::OutOfRange,
                format!("must be less than or equal to {upper}"),
            );
            return None;
        }
        Some(if self.round {
            round_to_cents(number)
        } else {
            number
        })
    }
}

/// Boolean constraint accepting common textual and 0/1 spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolRule;

impl FieldRule for BoolRule {
    type Output = bool;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<bool> {
        let coerced = match value {
            Value::Bool(flag) => Some(*flag),
            Value::Number(number) => match number.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        };
        if coerced.is_none() {
            mismatch(path, sink, "a boolean", value);
        }
        coerced
    }
}

/// Membership in a closed enumeration.
pub struct Choice<E>(PhantomData<E>);

impl<E> Choice<E> {
    /// Constraint for enum `E`.
    #[must_use]
    pub const fn of() -> Self {
        Self(PhantomData)
    }
}

impl<E> Clone for Choice<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Choice<E> {}

impl<E: WireEnum> FieldRule for Choice<E> {
    type Output = E;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<E> {
        let Some(raw) = value.as_str() else {
            mismatch(path, sink, "a string", value);
            return None;
        };
        let parsed = E::from_wire(raw);
        if parsed.is_none() {
            sink.report(
                path,
                ViolationKind::InvalidEnumValue,
                format!("must be one of: {}", E::expected()),
            );
        }
        parsed
    }
}

/// ISO 8601 timestamp, normalised to UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampRule;

impl FieldRule for TimestampRule {
    type Output = Timestamp;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Timestamp> {
        let Some(raw) = value.as_str() else {
            mismatch(path, sink, "a timestamp string", value);
            return None;
        };
        let parsed = Timestamp::parse(raw).ok();
        if parsed.is_none() {
            sink.report(
                path,
                ViolationKind::InvalidFormat,
                "must be an ISO 8601 timestamp",
            );
        }
        parsed
    }
}

/// UUID-shaped identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRule;

impl FieldRule for UuidRule {
    type Output = Uuid;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<Uuid> {
        let Some(raw) = value.as_str() else {
            mismatch(path, sink, "a UUID string", value);
            return None;
        };
        let parsed = Uuid::parse_str(raw).ok();
        if parsed.is_none() {
            sink.report(path, ViolationKind::InvalidFormat, "must be a valid UUID");
        }
        parsed
    }
}

/// Free-form JSON object, kept as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectRule;

impl FieldRule for ObjectRule {
    type Output = Map<String, Value>;

    fn apply(
        &self,
        value: &Value,
        path: &FieldPath,
        sink: &mut Violations,
    ) -> Option<Map<String, Value>> {
        let object = value.as_object().cloned();
        if object.is_none() {
            mismatch(path, sink, "an object", value);
        }
        object
    }
}

/// Any JSON value, kept as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValue;

impl FieldRule for AnyValue {
    type Output = Value;

    fn apply(&self, value: &Value, _path: &FieldPath, _sink: &mut Violations) -> Option<Value> {
        Some(value.clone())
    }
}

/// A JSON array whose items all satisfy `item`.
///
/// Every item is checked, so one payload reports every bad item.
#[derive(Debug, Clone, Copy)]
pub struct ListOf<R> {
    item: R,
    min_items: usize,
    max_items: Option<usize>,
}

impl<R: FieldRule> ListOf<R> {
    /// A list of any length.
    #[must_use]
    pub const fn new(item: R) -> Self {
        Self {
            item,
            min_items: 0,
            max_items: None,
        }
    }

    /// Require at least one item.
    #[must_use]
    pub const fn non_empty(self) -> Self {
        Self {
            min_items: 1,
            ..self
        }
    }

    /// Allow at most `max` items.
    #[must_use]
    pub const fn max_items(self, max: usize) -> Self {
        Self {
            max_items: Some(max),
            ..self
        }
    }
}

impl<R: FieldRule> FieldRule for ListOf<R> {
    type Output = Vec<R::Output>;

    fn apply(
        &self,
        value: &Value,
        path: &FieldPath,
        sink: &mut Violations,
    ) -> Option<Vec<R::Output>> {
        let Some(items) = value.as_array() else {
            mismatch(path, sink, "an array", value);
            return None;
        };
        if items.len() < self.min_items {
            sink.report(
                path,
                ViolationKind::OutOfRange,
                format!("must contain at least {} item(s)", self.min_items),
            );
            return None;
        }
        if let Some(max) = self.max_items.filter(|max| items.len() > *max) {
            sink.report(
                path,
                ViolationKind::OutOfRange,
                format!("must contain at most {max} item(s)"),
            );
            return None;
        }
        let parsed: Vec<Option<R::Output>> = items
            .iter()
            .enumerate()
            .map(|(index, item)| self.item.apply(item, &path.index(index), sink))
            .collect();
        parsed.into_iter().collect()
    }
}

/// A nested record validated by its own [`Schema`].
pub struct Nested<S>(PhantomData<S>);

impl<S> Nested<S> {
    /// Constraint for record type `S`.
    #[must_use]
    pub const fn of() -> Self {
        Self(PhantomData)
    }
}

impl<S> Clone for Nested<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Nested<S> {}

impl<S: Schema> FieldRule for Nested<S> {
    type Output = S;

    fn apply(&self, value: &Value, path: &FieldPath, sink: &mut Violations) -> Option<S> {
        let Some(object) = value.as_object() else {
            mismatch(path, sink, "an object", value);
            return None;
        };
        read_record(object, path, sink)
    }
}

#[cfg(test)]
mod tests;
