//! Assertions for the gateway's JSON error envelope
//! (`{error, code, details?, trace_id}` plus an `x-trace-id` header),
//! written against raw JSON so they do not depend on gateway types.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub code: String,
    #[serde(default)]
    pub details: Option<String>,
    pub trace_id: String,
}

/// Assert `resp` is an error envelope with `expected_status` and
/// `expected_code`, whose trace id matches the `x-trace-id` header.
/// Returns the parsed envelope for further checks.
pub async fn assert_error_envelope<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ErrorEnvelope
where
    B: MessageBody,
{
    assert_eq!(resp.status(), expected_status, "unexpected status");

    let trace_header = resp
        .headers()
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8")
        .to_string();

    let body = actix_web::test::read_body(resp).await;
    let envelope: ErrorEnvelope = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "body should be an error envelope ({e}): {}",
            String::from_utf8_lossy(&body)
        )
    });

    assert_eq!(envelope.code, expected_code, "unexpected error code");
    assert_eq!(
        envelope.trace_id, trace_header,
        "trace_id in body should match x-trace-id header"
    );
    envelope
}
