use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_envelope::assert_error_envelope;
use hotel_gateway::services::reference_data::CURRENCIES_KEY;
use serde_json::json;

use crate::common::{header, json_body};
use crate::support::sessions::BACKEND_TOKEN;
use crate::support::{create_test_app, session_cookie, test_state, FakeBackend, SessionSpec};

#[actix_web::test]
async fn update_and_delete_require_an_id() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner(), &state.security);
    let app = create_test_app(state).build().await;

    for req in [
        test::TestRequest::put().uri("/api/currency-rates"),
        test::TestRequest::put().uri("/api/currency-rates?id="),
        test::TestRequest::delete().uri("/api/currency-rates"),
    ] {
        let req = req
            .cookie(cookie.clone())
            .set_json(json!({ "rate": 2.71 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let envelope =
            assert_error_envelope(resp, StatusCode::BAD_REQUEST, "validation.missing_field").await;
        assert_eq!(envelope.error, "Currency rate ID is required");
    }
    assert_eq!(backend.call_count(), 0);
}

#[actix_web::test]
async fn list_forwards_query_and_appends_backend_token() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/currency-rates", 200, json!({ "data": [], "total": 0 }));
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/currency-rates?page=2&token=forged")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "cache-control").as_deref(), Some("no-store"));
    assert_eq!(json_body(resp).await, json!({ "data": [], "total": 0 }));

    let calls = backend.calls_to("/currency-rates");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query, format!("page=2&token={BACKEND_TOKEN}"));
    assert_eq!(calls[0].authorization, None);
}

#[actix_web::test]
async fn update_targets_the_rate_and_invalidates_currencies() {
    let backend = FakeBackend::start().await;
    backend.respond("PUT", "/currency-rates/5", 200, json!({ "id": 5, "rate": 2.71 }));
    let state = test_state(&backend.base_url);
    let cache = state.cache.clone();
    cache.set(CURRENCIES_KEY, json!([{ "code": "USD" }]), Duration::from_secs(3600));
    let cookie = session_cookie(&SessionSpec::owner(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::put()
        .uri("/api/currency-rates?id=5")
        .cookie(cookie)
        .set_json(json!({ "rate": 2.71 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let calls = backend.calls_to("/currency-rates/5");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "PUT");
    assert_eq!(calls[0].json(), json!({ "rate": 2.71 }));
    assert!(cache.get(CURRENCIES_KEY).is_none());
}

#[actix_web::test]
async fn backend_errors_pass_through_with_short_details() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "DELETE",
        "/currency-rates/9",
        422,
        json!({ "message": "Rate is in use\n    at RateService.remove (/srv/rates.js:88:11)", "stack": "..." }),
    );
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::delete()
        .uri("/api/currency-rates?id=9")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let envelope =
        assert_error_envelope(resp, StatusCode::UNPROCESSABLE_ENTITY, "backend.error").await;
    assert_eq!(envelope.error, "Backend request failed");
    assert_eq!(envelope.details.as_deref(), Some("Rate is in use"));
}
