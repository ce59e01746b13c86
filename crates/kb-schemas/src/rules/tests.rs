//! Tests for the declarative field constraints.

use rstest::rstest;
use serde_json::{Value, json};

use super::*;

fn apply<R: FieldRule>(rule: R, value: &Value) -> (Option<R::Output>, Vec<Violation>) {
    let mut sink = Violations::default();
    let path = FieldPath::root().child("field");
    let output = rule.apply(value, &path, &mut sink);
    (output, sink.0)
}

fn kind_of<R: FieldRule>(rule: R, value: &Value) -> Option<ViolationKind> {
    let (_, violations) = apply(rule, value);
    violations.first().map(Violation::kind)
}

#[rstest]
fn text_is_trimmed() {
    let (output, violations) = apply(TextRule::text(), &json!("  dog  "));
    assert_eq!(output.as_deref(), Some("dog"));
    assert!(violations.is_empty());
}

#[rstest]
fn verbatim_text_keeps_whitespace() {
    let (output, _) = apply(TextRule::verbatim(), &json!(" secret "));
    assert_eq!(output.as_deref(), Some(" secret "));
}

#[rstest]
#[case(json!(""))]
#[case(json!("   "))]
#[case(json!("\t\n"))]
fn blank_text_is_missing(#[case] value: Value) {
    assert_eq!(
        kind_of(TextRule::non_blank(), &value),
        Some(ViolationKind::MissingRequiredField)
    );
}

#[rstest]
#[case(json!("a"), Some(ViolationKind::OutOfRange))]
#[case(json!(" ab "), None)]
#[case(json!("abcd"), None)]
#[case(json!("abcde"), Some(ViolationKind::OutOfRange))]
#[case(json!(5), Some(ViolationKind::TypeMismatch))]
fn text_length_counts_trimmed_characters(
    #[case] value: Value,
    #[case] expected: Option<ViolationKind>,
) {
    assert_eq!(kind_of(TextRule::text().chars(2, 4), &value), expected);
}

#[rstest]
fn text_length_counts_scalar_values() {
    let (output, violations) = apply(TextRule::text().max_chars(3), &json!("ёжи"));
    assert_eq!(output.as_deref(), Some("ёжи"));
    assert!(violations.is_empty());
}

#[rstest]
#[case("12:30:00", None)]
#[case("9:05:59", None)]
#[case("23:59:59", None)]
#[case("24:00:00", Some(ViolationKind::InvalidFormat))]
#[case("12:30", Some(ViolationKind::InvalidFormat))]
#[case("12:60:00", Some(ViolationKind::InvalidFormat))]
fn clock_time_pattern(#[case] raw: &str, #[case] expected: Option<ViolationKind>) {
    assert_eq!(
        kind_of(TextRule::non_blank().pattern(CLOCK_TIME), &json!(raw)),
        expected
    );
}

#[rstest]
#[case(json!(5), Some(5))]
#[case(json!("5"), Some(5))]
#[case(json!(" 7 "), Some(7))]
#[case(json!(0), Some(0))]
#[case(json!(3.0), Some(3))]
fn counts_coerce_before_bounds(#[case] value: Value, #[case] expected: Option<u64>) {
    let (output, violations) = apply(CountRule::between(0, 10), &value);
    assert_eq!(output, expected);
    assert!(violations.is_empty());
}

#[rstest]
#[case(json!(-1), ViolationKind::OutOfRange)]
#[case(json!(11), ViolationKind::OutOfRange)]
#[case(json!("11"), ViolationKind::OutOfRange)]
#[case(json!(2.5), ViolationKind::TypeMismatch)]
#[case(json!("five"), ViolationKind::TypeMismatch)]
#[case(json!(true), ViolationKind::TypeMismatch)]
fn counts_reject_bad_values(#[case] value: Value, #[case] expected: ViolationKind) {
    assert_eq!(kind_of(CountRule::between(0, 10), &value), Some(expected));
}

#[rstest]
fn positive_count_rejects_zero() {
    assert_eq!(
        kind_of(CountRule::positive(), &json!(0)),
        Some(ViolationKind::OutOfRange)
    );
}

#[rstest]
fn signed_integers_accept_negatives() {
    let (output, _) = apply(IntRule::any(), &json!(-42));
    assert_eq!(output, Some(-42));
}

#[rstest]
#[case(json!(0), Some(false))]
#[case(json!(1), Some(true))]
#[case(json!("1"), Some(true))]
fn flags_read_zero_and_one(#[case] value: Value, #[case] expected: Option<bool>) {
    assert_eq!(apply(FlagRule, &value).0, expected);
}

#[rstest]
fn flags_reject_two() {
    assert_eq!(kind_of(FlagRule, &json!(2)), Some(ViolationKind::OutOfRange));
}

#[rstest]
#[case(json!(0.333), 0.33)]
#[case(json!("0.4"), 0.4)]
#[case(json!(1), 1.0)]
fn thresholds_are_rounded(#[case] value: Value, #[case] expected: f64) {
    assert_eq!(apply(FloatRule::unit_interval(), &value).0, Some(expected));
}

#[rstest]
fn unrounded_thresholds_keep_their_precision() {
    let rule = FloatRule::unit_interval().unrounded();
    assert_eq!(apply(rule, &json!(0.004)).0, Some(0.004));
    assert_eq!(kind_of(rule, &json!(1.004)), Some(ViolationKind::OutOfRange));
}

#[rstest]
#[case(json!(1.2), ViolationKind::OutOfRange)]
#[case(json!(-0.1), ViolationKind::OutOfRange)]
#[case(json!("NaN"), ViolationKind::TypeMismatch)]
#[case(json!("inf"), ViolationKind::TypeMismatch)]
#[case(json!([0.5]), ViolationKind::TypeMismatch)]
fn thresholds_reject_bad_values(#[case] value: Value, #[case] expected: ViolationKind) {
    assert_eq!(kind_of(FloatRule::unit_interval(), &value), Some(expected));
}

#[rstest]
#[case(json!(true), true)]
#[case(json!("false"), false)]
#[case(json!("Yes"), true)]
#[case(json!("off"), false)]
#[case(json!(1), true)]
fn booleans_accept_common_spellings(#[case] value: Value, #[case] expected: bool) {
    assert_eq!(apply(BoolRule, &value).0, Some(expected));
}

#[rstest]
fn booleans_reject_other_strings() {
    assert_eq!(
        kind_of(BoolRule, &json!("maybe")),
        Some(ViolationKind::TypeMismatch)
    );
}

#[rstest]
fn choices_reject_unknown_members() {
    let (output, violations) = apply(Choice::<pagination::SortOrder>::of(), &json!("up"));
    assert!(output.is_none());
    let violation = violations.first().expect("violation");
    assert_eq!(violation.kind(), ViolationKind::InvalidEnumValue);
    assert_eq!(violation.message(), "must be one of: asc, desc");
}

#[rstest]
fn timestamps_are_normalised() {
    let (output, _) = apply(TimestampRule, &json!("2024-01-02T03:04:05+02:00"));
    assert_eq!(
        output.map(|ts| ts.to_canonical()).as_deref(),
        Some("2024-01-02T01:04:05Z")
    );
}

#[rstest]
#[case(json!("not a date"), ViolationKind::InvalidFormat)]
#[case(json!(1_704_164_645), ViolationKind::TypeMismatch)]
fn timestamps_reject_bad_values(#[case] value: Value, #[case] expected: ViolationKind) {
    assert_eq!(kind_of(TimestampRule, &value), Some(expected));
}

#[rstest]
fn uuids_reject_malformed_values() {
    assert_eq!(
        kind_of(UuidRule, &json!("3fa85f64-5717-4562-b3fc")),
        Some(ViolationKind::InvalidFormat)
    );
}

#[rstest]
fn lists_report_every_bad_item() {
    let (output, violations) = apply(
        ListOf::new(UuidRule),
        &json!(["3fa85f64-5717-4562-b3fc-2c963f66afa6", "nope", 4]),
    );
    assert!(output.is_none());
    let paths: Vec<_> = violations
        .iter()
        .map(|violation| violation.field_path().as_str())
        .collect();
    assert_eq!(paths, vec!["field[1]", "field[2]"]);
}

#[rstest]
#[case(json!([]), Some(ViolationKind::OutOfRange))]
#[case(json!([1]), None)]
#[case(json!([1, 2, 3]), Some(ViolationKind::OutOfRange))]
#[case(json!({"a": 1}), Some(ViolationKind::TypeMismatch))]
fn list_lengths_are_bounded(#[case] value: Value, #[case] expected: Option<ViolationKind>) {
    let rule = ListOf::new(CountRule::non_negative()).non_empty().max_items(2);
    assert_eq!(kind_of(rule, &value), expected);
}

#[rstest]
fn objects_are_kept_verbatim() {
    let (output, _) = apply(ObjectRule, &json!({ "k": [1, "v"] }));
    assert_eq!(output.map(Value::Object), Some(json!({ "k": [1, "v"] })));
}

#[rstest]
fn finish_never_returns_an_empty_error() {
    let outcome = Violations::default().finish::<u8>(None);
    let err = outcome.expect_err("rejected");
    assert_eq!(err.violations().len(), 1);
}
