//! Search query payloads.

use serde::Serialize;

use crate::record::{RecordReader, Schema};
use crate::rules::{CountRule, ListOf, Nested, TextRule};

/// One question sent to a service for answer retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Target service.
    pub service_id: String,
    /// Access token of the service, kept exactly as supplied.
    pub service_token: String,
    /// The user's question.
    pub query: String,
    /// Number of candidate documents to return.
    pub top_k: u64,
    /// Conversation session, empty when stateless.
    pub session_id: String,
    /// Intents that restrict matching.
    pub intents: Vec<String>,
    /// Document the question refers back to, 0 for none.
    pub context_document_id: u64,
    /// Minimum score a candidate must reach.
    pub lower_bound: u64,
}

impl Schema for Query {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let service_id = fields.required("service_id", TextRule::non_blank());
        let service_token = fields.required("service_token", TextRule::verbatim().min_chars(1));
        let query = fields.required("query", TextRule::non_blank());
        let top_k = fields.or("top_k", CountRule::positive(), 3);
        let session_id = fields.or_else("session_id", TextRule::text(), String::new);
        let intents = fields.or_else("intents", ListOf::new(TextRule::text()), Vec::new);
        let context_document_id = fields.or("context_document_id", CountRule::non_negative(), 0);
        let lower_bound = fields.or("lower_bound", CountRule::non_negative(), 0);
        Some(Self {
            service_id: service_id?,
            service_token: service_token?,
            query: query?,
            top_k: top_k?,
            session_id: session_id?,
            intents: intents?,
            context_document_id: context_document_id?,
            lower_bound: lower_bound?,
        })
    }
}

/// Up to 100 queries answered in one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchQuery {
    /// The queries.
    pub payload: Vec<Query>,
}

impl Schema for BatchQuery {
    fn read(fields: &mut RecordReader<'_>) -> Option<Self> {
        let payload = fields.required(
            "payload",
            ListOf::new(Nested::<Query>::of()).non_empty().max_items(100),
        );
        Some(Self { payload: payload? })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::{ViolationKind, validate};

    fn query(text: &str) -> Value {
        json!({ "service_id": "42", "service_token": "tok", "query": text })
    }

    #[rstest]
    fn query_defaults_apply() {
        let parsed = validate::<Query>(&query("  where is my order  ")).expect("valid query");
        assert_eq!(parsed.query, "where is my order");
        assert_eq!(parsed.top_k, 3);
        assert_eq!(parsed.session_id, "");
        assert!(parsed.intents.is_empty());
    }

    #[rstest]
    #[case(0, Some(ViolationKind::OutOfRange))]
    #[case(1, None)]
    #[case(100, None)]
    #[case(101, Some(ViolationKind::OutOfRange))]
    fn batch_size_is_bounded(#[case] size: usize, #[case] expected: Option<ViolationKind>) {
        let payload: Vec<Value> = (0..size).map(|_| query("hi")).collect();
        let outcome = validate::<BatchQuery>(&json!({ "payload": payload }));
        let kind = outcome
            .err()
            .and_then(|err| err.find("payload").map(|violation| violation.kind()));
        assert_eq!(kind, expected);
    }

    #[rstest]
    fn batch_reports_the_failing_query() {
        let err = validate::<BatchQuery>(&json!({ "payload": [query("hi"), query(" ")] }))
            .expect_err("blank query");
        assert_eq!(
            err.find("payload[1].query").map(|violation| violation.kind()),
            Some(ViolationKind::MissingRequiredField)
        );
    }
}
