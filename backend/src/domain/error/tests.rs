//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({ "code": "not_found", "message": "gone" });

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("valid payload")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_snake_case_envelope(expected_trace_id: String) {
    let error = Error::not_found("user 7 not found")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "user_id": 7 }));

    let value = serde_json::to_value(&error).expect("serialises");
    assert_eq!(value["code"], "not_found");
    assert_eq!(value["message"], "user 7 not found");
    assert_eq!(value["trace_id"], expected_trace_id);
    assert_eq!(value["details"]["user_id"], 7);
}

#[rstest]
fn serialisation_omits_absent_fields(base_error: Error) {
    let value = serde_json::to_value(&base_error).expect("serialises");
    assert!(value.get("trace_id").is_none());
    assert!(value.get("details").is_none());
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({ "code": "conflict", "message": " " }));
    assert!(result.is_err());
}

#[rstest]
fn display_uses_message(base_error: Error) {
    assert_eq!(base_error.to_string(), "bad");
}
