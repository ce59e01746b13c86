//! Integration tests for the named-schema entry point.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use kb_schemas::{RegistryError, SchemaName, ViolationKind, validate_named};
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[case("services_get", json!({}))]
#[case("service_get", json!({ "include_documents": "1", "include_suggested": 0 }))]
#[case("get_paraphrases", json!({ "document_id": 3, "count": "10" }))]
#[case("query", json!({ "service_id": " 42 ", "service_token": " tok ", "query": "dogs?" }))]
#[case("close_conversation", json!({ "operator": { "login": " op " } }))]
#[case(
    "conversations_count_report",
    json!({ "dateRange": { "from": "2024-01-01", "to": "2024-01-31T12:00:00+03:00" } })
)]
#[case(
    "service_prompt",
    json!({
        "heading": " Be brief ",
        "qa": [{ "id": 1, "type": "standard", "question": "Hi?", "answer": "Hello" }],
        "enabled_parts": { "heading": 1, "guidelines": "no", "standard_qa": true, "clarifying_qa": "off" },
    })
)]
#[case(
    "suggested_documents",
    json!({ "from": "2024-03-01T00:00:00Z", "to": "2024-03-02T00:00:00Z", "limit": 5 })
)]
#[case(
    "question",
    json!({
        "dt": "2024-01-02T03:04:05.5+02:00",
        "text": " hello ",
        "fileIds": ["3FA85F64-5717-4562-B3FC-2C963F66AFA6"],
        "channelUser": {
            "id": "u1", "login": "user", "email": "u@example.com",
            "phone": "+100", "fullName": "User One",
        },
    })
)]
fn normalised_records_are_fixed_points(#[case] name: &str, #[case] payload: Value) {
    let first = validate_named(name, &payload).expect("payload should be accepted");
    let second = validate_named(name, &first).expect("normalised record should be accepted");
    assert_eq!(first, second);
}

#[rstest]
fn question_is_canonicalised() {
    let record = validate_named(
        "question",
        &json!({
            "dt": "2024-01-02T03:04:05.5+02:00",
            "text": " hello ",
            "fileIds": ["3FA85F64-5717-4562-B3FC-2C963F66AFA6"],
            "channelUser": {
                "id": "u1", "login": "user", "email": "u@example.com",
                "phone": "+100", "fullName": "User One",
            },
        }),
    )
    .expect("valid question");
    assert_eq!(record["dt"], "2024-01-02T01:04:05.500000Z");
    assert_eq!(record["text"], "hello");
    assert_eq!(record["fileIds"][0], "3fa85f64-5717-4562-b3fc-2c963f66afa6");
}

#[rstest]
fn unknown_keys_are_dropped() {
    let record = validate_named("var", &json!({ "name": "a", "value": "b", "extra": 1 }))
        .expect("valid var");
    assert_eq!(record, json!({ "name": "a", "value": "b" }));
}

#[rstest]
fn nested_violations_carry_full_paths() {
    let err = validate_named(
        "batch_query",
        &json!({ "payload": [
            { "service_id": "1", "service_token": "t", "query": "ok" },
            { "service_id": "1", "service_token": "t", "query": "  " },
        ] }),
    )
    .expect_err("blank query");
    let RegistryError::Invalid(errors) = err else {
        panic!("expected violations, got {err}");
    };
    let violation = errors.find("payload[1].query").expect("nested violation");
    assert_eq!(violation.kind(), ViolationKind::MissingRequiredField);
}

#[rstest]
fn every_schema_rejects_a_non_object() {
    for schema in SchemaName::all() {
        let err = schema
            .validate(&json!("not a record"))
            .expect_err("string payload");
        let RegistryError::Invalid(errors) = err else {
            panic!("{schema}: expected violations");
        };
        assert_eq!(
            errors.violations().first().map(|violation| violation.kind()),
            Some(ViolationKind::TypeMismatch),
            "{schema}"
        );
    }
}
