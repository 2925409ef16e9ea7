use std::time::SystemTime;

use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::auth::cookies::{clear_auth_cookies, cleared_cookies, set_auth_cookies};
use crate::auth::session::{SessionRejection, unix_seconds};
use crate::auth::storage_scope::ClientStorageScope;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::session::{resolve_session, CurrentSession};
use crate::extractors::validated_json::ValidatedJson;
use crate::logging::security;
use crate::protocol::views::{LoginView, MeView, RefreshView, SessionTiming, SessionUser};
use crate::services::sessions::{self, Credentials, LoginKind};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Credential exchange shared by the regular and superadmin login routes.
pub(crate) async fn login_with(
    kind: LoginKind,
    body: LoginRequest,
    app_state: &AppState,
) -> Result<HttpResponse, AppError> {
    let credentials = Credentials::new(body.email.as_deref(), body.password.as_deref())?;

    let issued = sessions::login(
        &app_state.backend,
        &app_state.security,
        &credentials,
        kind,
        SystemTime::now(),
    )
    .await
    .inspect_err(|e| match e.code() {
        ErrorCode::InvalidCredentials => security::login_failed("invalid credentials", &credentials.email),
        ErrorCode::NotSuperAdmin => security::login_failed("not a superadmin", &credentials.email),
        _ => {}
    })?;

    let mut builder = HttpResponse::Ok();
    set_auth_cookies(&mut builder, &issued.token, &issued.payload, &app_state.security);
    Ok(builder.json(LoginView {
        success: true,
        user: SessionUser::from(&issued.payload.identity),
    }))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    login_with(LoginKind::Regular, body.into_inner(), &app_state).await
}

async fn logout(app_state: web::Data<AppState>) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    clear_auth_cookies(&mut builder, &app_state.security);
    builder.json(json!({ "success": true }))
}

async fn me(session: CurrentSession) -> HttpResponse {
    HttpResponse::Ok().json(MeView::for_session(&session))
}

/// The backend token, for client code that talks to the backend directly.
async fn token(session: CurrentSession) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "token": session.backend_token() }))
}

/// Error response that also clears the session cookies.
fn rejected(err: AppError, app_state: &AppState) -> HttpResponse {
    let mut resp = err.error_response();
    for cookie in cleared_cookies(&app_state.security) {
        if let Err(e) = resp.add_cookie(&cookie) {
            warn!(cookie = cookie.name(), error = %e, "failed to clear session cookie");
        }
    }
    resp
}

async fn refresh(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let current = match resolve_session(&req)? {
        Ok(session) => session,
        Err(SessionRejection::Expired) => {
            return Ok(rejected(AppError::unauthorized_expired(), &app_state))
        }
        Err(SessionRejection::Invalid) => {
            return Ok(rejected(AppError::unauthorized_invalid(), &app_state))
        }
    };

    let now = SystemTime::now();
    let issued = sessions::refresh(
        &app_state.backend,
        &app_state.security,
        current,
        app_state.config.approval_check_timeout,
        now,
    )
    .await?;

    let session = SessionTiming {
        expires_at: issued.payload.exp,
        expires_in: issued.payload.exp - unix_seconds(now)?,
    };
    let mut builder = HttpResponse::Ok();
    set_auth_cookies(&mut builder, &issued.token, &issued.payload, &app_state.security);
    Ok(builder.json(RefreshView {
        success: true,
        user: SessionUser::from(&issued.payload.identity),
        session,
    }))
}

/// Tell the client whether browser-stored data still belongs to the caller.
async fn storage_scope(
    req: HttpRequest,
    body: ValidatedJson<ClientStorageScope>,
) -> Result<HttpResponse, AppError> {
    let current = resolve_session(&req)?.ok();
    let status = body.validate(current.as_ref(), SystemTime::now());
    Ok(HttpResponse::Ok().json(json!({ "status": status })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/logout").route(web::post().to(logout)))
        .service(web::resource("/me").route(web::get().to(me)))
        .service(web::resource("/token").route(web::get().to(token)))
        .service(web::resource("/refresh").route(web::post().to(refresh)))
        .service(web::resource("/storage-scope").route(web::post().to(storage_scope)));
}

/// `POST /api/auth/login` on its own, for callers that wrap it separately.
pub fn login_resource() -> actix_web::Resource {
    web::resource("/api/auth/login").route(web::post().to(login))
}
