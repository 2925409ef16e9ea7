use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use crate::common::json_body;
use crate::support::sessions::BACKEND_TOKEN;
use crate::support::{create_test_app, session_cookie, test_state, FakeBackend, SessionSpec};

const MULTIPART: &str = "multipart/form-data; boundary=----hotelform";

fn multipart_body() -> Vec<u8> {
    [
        "------hotelform\r\n",
        "Content-Disposition: form-data; name=\"name\"\r\n\r\n",
        "Seaside Inn\r\n",
        "------hotelform\r\n",
        "Content-Disposition: form-data; name=\"photo\"; filename=\"front.jpg\"\r\n",
        "Content-Type: image/jpeg\r\n\r\n",
        "\u{00ff}\u{00d8}binary\r\n",
        "------hotelform--\r\n",
    ]
    .concat()
    .into_bytes()
}

#[actix_web::test]
async fn multipart_hotel_creation_is_forwarded_byte_for_byte() {
    let backend = FakeBackend::start().await;
    backend.respond("POST", "/hotel", 201, json!({ "id": 3, "approved": false }));
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner().hotel_approved(false), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/hotel")
        .cookie(cookie)
        .insert_header(("content-type", MULTIPART))
        .set_payload(multipart_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    // Proxied successes are normalised to 200.
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["id"], 3);

    let calls = backend.calls_to("/hotel");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].content_type.as_deref(), Some(MULTIPART));
    assert_eq!(&calls[0].body[..], &multipart_body()[..]);
    assert_eq!(
        calls[0].authorization.as_deref(),
        Some(format!("Bearer {BACKEND_TOKEN}").as_str())
    );
    assert_eq!(calls[0].query, "");
}

#[actix_web::test]
async fn json_hotel_creation_is_forwarded_as_json() {
    let backend = FakeBackend::start().await;
    backend.respond("POST", "/hotel", 200, json!({ "id": 4 }));
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/hotel")
        .cookie(cookie)
        .set_json(json!({ "name": "Old Town Suites", "rooms": 12 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let calls = backend.calls_to("/hotel");
    assert_eq!(calls[0].json(), json!({ "name": "Old Town Suites", "rooms": 12 }));
    assert!(calls[0]
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("application/json")));
}

#[actix_web::test]
async fn workers_use_bearer_auth() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/workers", 200, json!([{ "id": 8, "name": "Tamar" }]));
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/workers")
        .cookie(cookie)
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body[0]["name"], "Tamar");

    let calls = backend.calls_to("/workers");
    assert_eq!(
        calls[0].authorization.as_deref(),
        Some(format!("Bearer {BACKEND_TOKEN}").as_str())
    );
    assert!(!calls[0].query.contains("token="));
}
