use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_envelope::assert_error_envelope;
use serde_json::json;

use crate::common::header;
use crate::support::{create_test_app, session_cookie, test_state, FakeBackend, SessionSpec};

#[actix_web::test]
async fn unknown_superadmin_resource_is_not_found() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::superadmin(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/superadmin/invoices")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let request_id = header(&resp, "x-request-id").expect("request id");
    let envelope = assert_error_envelope(resp, StatusCode::NOT_FOUND, "not_found").await;
    assert_eq!(envelope.trace_id, request_id);
    assert_eq!(backend.call_count(), 0);
}

#[actix_web::test]
async fn every_error_gets_its_own_trace_id() {
    let backend = FakeBackend::start().await;
    let app = create_test_app(test_state(&backend.base_url)).build().await;

    let mut seen = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("x-request-id", "edge-7f3a"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let request_id = header(&resp, "x-request-id").expect("request id");
        assert_ne!(request_id, "edge-7f3a");
        let envelope =
            assert_error_envelope(resp, StatusCode::UNAUTHORIZED, "auth.required").await;
        assert_eq!(envelope.trace_id, request_id);
        seen.push(envelope.trace_id);
    }
    assert_ne!(seen[0], seen[1]);
}

#[actix_web::test]
async fn backend_internals_never_leak() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "GET",
        "/workers",
        500,
        json!({ "stack": "TypeError: cannot read property 'id' of undefined\n    at /srv/app.js:88" }),
    );
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri("/api/workers").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    let envelope =
        assert_error_envelope(resp, StatusCode::INTERNAL_SERVER_ERROR, "backend.error").await;
    assert_eq!(envelope.error, "Backend request failed");
    assert_eq!(envelope.details, None);
}
