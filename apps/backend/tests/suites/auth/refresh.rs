use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_envelope::assert_error_envelope;
use hotel_gateway::config::app::AppConfig;
use hotel_gateway::infra::state::build_state;
use hotel_gateway::state::app_state::AppState;
use serde_json::json;

use crate::common::json_body;
use crate::support::app_builder::TEST_SECRET;
use crate::support::fake_backend::unreachable_url;
use crate::support::sessions::BACKEND_TOKEN;
use crate::support::{create_test_app, session_cookie, test_state, FakeBackend, SessionSpec};

fn state_with_approval_timeout(backend_url: &str, timeout: Duration) -> AppState {
    let mut config = AppConfig::for_backend(backend_url, TEST_SECRET);
    config.approval_check_timeout = timeout;
    build_state().with_config(config).build().expect("build state")
}

#[actix_web::test]
async fn unreachable_backend_keeps_previous_approval() {
    let state = test_state(&unreachable_url());
    let spec = SessionSpec::owner().hotel_approved(false);
    let cookie = session_cookie(&spec, &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let renewed = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session_token")
        .map(|c| c.value().to_string())
        .expect("refreshed session cookie");
    assert!(!renewed.is_empty());

    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["hotelApproved"], false);
    assert_eq!(body["session"]["expiresIn"], 1800);
}

#[actix_web::test]
async fn refresh_picks_up_new_approval() {
    let backend = FakeBackend::start().await;
    backend.respond("GET", "/hotel/approval-status", 200, json!({ "approved": true }));
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner().hotel_approved(false), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let mirror = resp
        .response()
        .cookies()
        .find(|c| c.name() == "hotel_approved")
        .map(|c| c.value().to_string());
    assert_eq!(mirror.as_deref(), Some("true"));

    let body = json_body(resp).await;
    assert_eq!(body["user"]["hotelApproved"], true);

    let calls = backend.calls_to("/hotel/approval-status");
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].authorization.as_deref(),
        Some(format!("Bearer {BACKEND_TOKEN}").as_str())
    );
}

#[actix_web::test]
async fn slow_approval_check_does_not_block_refresh() {
    let backend = FakeBackend::start().await;
    backend.respond_after(
        "GET",
        "/hotel/approval-status",
        200,
        json!({ "approved": true }),
        Duration::from_secs(2),
    );
    let state = state_with_approval_timeout(&backend.base_url, Duration::from_millis(100));
    let cookie = session_cookie(&SessionSpec::owner().hotel_approved(false), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["user"]["hotelApproved"], false);
}

#[actix_web::test]
async fn superadmin_refresh_skips_approval_check() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::superadmin(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(cookie)
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["session"]["expiresIn"], 86_400);
    assert_eq!(backend.call_count(), 0);
}

#[actix_web::test]
async fn expired_session_is_rejected_and_cleared() {
    let state = test_state(&unreachable_url());
    let cookie = session_cookie(&SessionSpec::owner().expired(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cleared: Vec<(String, String)> = resp
        .response()
        .cookies()
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect();
    assert_eq!(cleared.len(), 4);
    assert!(cleared.iter().all(|(_, value)| value.is_empty()));

    let envelope = assert_error_envelope(resp, StatusCode::UNAUTHORIZED, "auth.expired").await;
    assert_eq!(envelope.error, "Session expired");
}

#[actix_web::test]
async fn forged_or_missing_session_is_invalid() {
    let state = test_state(&unreachable_url());
    let foreign = hotel_gateway::SecurityConfig::new(b"some-other-secret".to_vec());
    let forged = session_cookie(&SessionSpec::owner(), &foreign);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .cookie(forged)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_envelope(resp, StatusCode::UNAUTHORIZED, "auth.invalid").await;

    let req = test::TestRequest::post().uri("/api/auth/refresh").to_request();
    let resp = test::call_service(&app, req).await;
    assert_error_envelope(resp, StatusCode::UNAUTHORIZED, "auth.invalid").await;
}
