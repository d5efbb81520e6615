//! Tests for the error payload formatting and trace propagation.

use super::*;
use crate::domain::TraceId;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("No input provided")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("Authentication required"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("Chat not found"), ErrorCode::NotFound)]
#[case(Error::conflict("email taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("model down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
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
fn serialises_message_under_error_key(expected_trace_id: String) {
    let error = Error::not_found("Chat not found")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "chatId": "abc" }));

    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({
            "code": "not_found",
            "error": "Chat not found",
            "traceId": expected_trace_id,
            "details": { "chatId": "abc" },
        })
    );
}

#[rstest]
fn omits_absent_optional_fields(base_error: Error) {
    let value = serde_json::to_value(&base_error).expect("serialise error");
    assert!(value.get("traceId").is_none());
    assert!(value.get("details").is_none());
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({ "code": "unauthorized", "error": "Authentication required" });

    let error: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("decode error")
    })
    .await;

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert!(error.trace_id().is_none());
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let payload = json!({ "code": "internal_error", "error": "  " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}
