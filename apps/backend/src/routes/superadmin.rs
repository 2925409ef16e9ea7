//! Platform administration. Everything except `/login` requires a
//! superadmin session and uses bearer auth.

use actix_web::{web, HttpRequest, HttpResponse};
use bytes::Bytes;

use super::auth::{login_with, LoginRequest};
use super::proxy::{json_response, outbound_body, query_pairs, CachePolicy};
use crate::error::AppError;
use crate::extractors::session::SuperAdminSession;
use crate::extractors::validated_json::ValidatedJson;
use crate::infra::backend_api::{BackendRequest, TokenPlacement};
use crate::services::sessions::LoginKind;
use crate::state::app_state::AppState;

/// Resources proxied 1:1 to `/superadmin/<name>` on the backend. A GET on
/// the approve resources lists what is pending.
pub const RESOURCES: [&str; 6] = [
    "owners",
    "properties",
    "property-commissions",
    "price-policies",
    "approve-user",
    "approve-property",
];

fn backend_path(resource: &str) -> Result<String, AppError> {
    RESOURCES
        .iter()
        .find(|known| **known == resource)
        .map(|known| format!("/superadmin/{known}"))
        .ok_or_else(|| AppError::not_found(format!("Unknown superadmin resource '{resource}'")))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    login_with(LoginKind::SuperAdmin, body.into_inner(), &app_state).await
}

async fn list(
    session: SuperAdminSession,
    resource: web::Path<String>,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut request = BackendRequest::get(backend_path(&resource)?);
    for (name, value) in query_pairs(&req)? {
        request = request.query(name, value);
    }
    let request = request.authorized(session.backend_token(), TokenPlacement::Bearer);
    let value = app_state.backend.send(request).await?;
    Ok(json_response(&value, CachePolicy::NoStore))
}

async fn submit(
    session: SuperAdminSession,
    resource: web::Path<String>,
    req: HttpRequest,
    body: Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = BackendRequest::post(backend_path(&resource)?)
        .body(outbound_body(&req, body)?)
        .authorized(session.backend_token(), TokenPlacement::Bearer);
    let value = app_state.backend.send(request).await?;
    Ok(json_response(&value, CachePolicy::NoStore))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)))
        .service(
            web::resource("/{resource}")
                .route(web::get().to(list))
                .route(web::post().to(submit)),
        );
}

/// `POST /api/superadmin/login` on its own, for callers that wrap it separately.
pub fn login_resource() -> actix_web::Resource {
    web::resource("/api/superadmin/login").route(web::post().to(login))
}
