//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("sign in"), ErrorCode::Unauthorized)]
#[case(Error::invalid_credentials("nope"), ErrorCode::InvalidCredentials)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::insufficient_funds("poor"), ErrorCode::InsufficientFunds)]
#[case(Error::already_occupied("busy"), ErrorCode::AlreadyOccupied)]
#[case(Error::quota_exceeded("full"), ErrorCode::QuotaExceeded)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
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
    let payload = json!({ "code": "not_found", "message": "missing" });

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("payload is valid")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_with_snake_case_codes(expected_trace_id: String) {
    let error = Error::quota_exceeded("full")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "limit": 5 }));

    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(
        value,
        json!({
            "code": "quota_exceeded",
            "message": "full",
            "traceId": expected_trace_id,
            "details": { "limit": 5 },
        })
    );
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let payload = json!({ "code": "conflict", "message": " " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
fn display_uses_message() {
    let error = Error::already_occupied("Cell 4 is already occupied.");
    assert_eq!(error.to_string(), "Cell 4 is already occupied.");
}
