use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use crate::common::{header, json_body};
use crate::support::{create_test_app, session_cookie, test_state, FakeBackend, SessionSpec};

#[actix_web::test]
async fn anonymous_visitor_is_sent_to_login_with_return_path() {
    let backend = FakeBackend::start().await;
    let app = create_test_app(test_state(&backend.base_url)).build().await;

    for (uri, location) in [
        ("/admin/rooms", "/login?redirect=%2Fadmin%2Frooms"),
        ("/user/bookings?page=2", "/login?redirect=%2Fuser%2Fbookings%3Fpage%3D2"),
        ("/superadmin", "/login?redirect=%2Fsuperadmin"),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(header(&resp, "location").as_deref(), Some(location));
        assert_eq!(header(&resp, "cache-control").as_deref(), Some("no-store"));
    }
    assert_eq!(backend.call_count(), 0);
}

#[actix_web::test]
async fn unapproved_owner_is_held_on_hotel_info() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner().hotel_approved(false), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/admin/hotel-info")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["path"], "/admin/hotel-info");
    assert_eq!(body["user"]["hotelApproved"], false);
    assert_eq!(body["capabilities"]["createHotel"], true);

    for uri in ["/admin", "/admin/rooms", "/admin/hotel-info/photos"] {
        let req = test::TestRequest::get().uri(uri).cookie(cookie.clone()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
        assert_eq!(header(&resp, "location").as_deref(), Some("/admin/hotel-info"));
    }
}

#[actix_web::test]
async fn unapproved_owner_account_is_held_too() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner().user_approved(false), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri("/admin/rooms").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(header(&resp, "location").as_deref(), Some("/admin/hotel-info"));
}

#[actix_web::test]
async fn approved_owner_reaches_admin_pages() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri("/admin/rooms").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["capabilities"]["manageRooms"], true);

    let req = test::TestRequest::get().uri("/superadmin/owners").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(header(&resp, "location").as_deref(), Some("/unauthorized"));
}

#[actix_web::test]
async fn worker_is_kept_out_of_admin_but_reaches_user_pages() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::worker(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri("/admin/rooms").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(header(&resp, "location").as_deref(), Some("/unauthorized"));

    let req = test::TestRequest::get().uri("/user/profile").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["user"]["userType"], 3);
    assert_eq!(body["capabilities"]["accessAdmin"], false);
}

#[actix_web::test]
async fn superadmin_reaches_superadmin_pages_only() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::superadmin(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/superadmin/owners")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["capabilities"]["approveUsers"], true);

    let req = test::TestRequest::get().uri("/admin").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(header(&resp, "location").as_deref(), Some("/unauthorized"));
}

#[actix_web::test]
async fn expired_session_is_treated_as_anonymous() {
    let backend = FakeBackend::start().await;
    let state = test_state(&backend.base_url);
    let cookie = session_cookie(&SessionSpec::owner().expired(), &state.security);
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get().uri("/admin/rooms").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        header(&resp, "location").as_deref(),
        Some("/login?redirect=%2Fadmin%2Frooms")
    );
}

#[actix_web::test]
async fn fresh_login_for_unapproved_hotel_lands_on_hotel_info() {
    let backend = FakeBackend::start().await;
    backend.respond(
        "POST",
        "/auth/login",
        200,
        json!({
            "token": "bk-new-owner",
            "user": {
                "id": 11,
                "email": "new.owner@harbour.example",
                "name": "Giorgi",
                "hotelId": 9,
                "userType": 2,
                "userApproved": true,
                "hotelApproved": false
            }
        }),
    );
    let app = create_test_app(test_state(&backend.base_url)).build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "new.owner@harbour.example", "password": "pw" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session_token")
        .map(|c| c.into_owned())
        .expect("session cookie");

    let req = test::TestRequest::get().uri("/admin/bookings").cookie(session).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(header(&resp, "location").as_deref(), Some("/admin/hotel-info"));
}
