use actix_web::{web, HttpRequest, HttpResponse};
use bytes::Bytes;
use reqwest::Method;

use super::proxy::{json_response, outbound_body, path_segment, query_pairs, query_value, CachePolicy};
use crate::error::AppError;
use crate::extractors::session::CurrentSession;
use crate::infra::backend_api::{BackendRequest, TokenPlacement};
use crate::services::reference_data::invalidate_currencies;
use crate::state::app_state::AppState;

const RESOURCE: &str = "/currency-rates";

fn rate_id(req: &HttpRequest) -> Result<String, AppError> {
    let pairs = query_pairs(req)?;
    query_value(&pairs, "id").ok_or_else(|| AppError::missing_field("Currency rate ID is required"))
}

async fn list(
    session: CurrentSession,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut request = BackendRequest::get(RESOURCE);
    for (name, value) in query_pairs(&req)? {
        request = request.query(name, value);
    }
    let request = request.authorized(session.backend_token(), TokenPlacement::Query);
    let value = app_state.backend.send(request).await?;
    Ok(json_response(&value, CachePolicy::NoStore))
}

async fn create(
    session: CurrentSession,
    req: HttpRequest,
    body: Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = BackendRequest::post(RESOURCE)
        .body(outbound_body(&req, body)?)
        .authorized(session.backend_token(), TokenPlacement::Query);
    let value = app_state.backend.send(request).await?;
    invalidate_currencies(&app_state.cache);
    Ok(json_response(&value, CachePolicy::NoStore))
}

async fn update(
    session: CurrentSession,
    req: HttpRequest,
    body: Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = rate_id(&req)?;
    let request = BackendRequest::new(Method::PUT, format!("{RESOURCE}/{}", path_segment(&id)))
        .body(outbound_body(&req, body)?)
        .authorized(session.backend_token(), TokenPlacement::Query);
    let value = app_state.backend.send(request).await?;
    invalidate_currencies(&app_state.cache);
    Ok(json_response(&value, CachePolicy::NoStore))
}

async fn remove(
    session: CurrentSession,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = rate_id(&req)?;
    let request = BackendRequest::new(Method::DELETE, format!("{RESOURCE}/{}", path_segment(&id)))
        .authorized(session.backend_token(), TokenPlacement::Query);
    let value = app_state.backend.send(request).await?;
    invalidate_currencies(&app_state.cache);
    Ok(json_response(&value, CachePolicy::NoStore))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(RESOURCE)
            .route(web::get().to(list))
            .route(web::post().to(create))
            .route(web::put().to(update))
            .route(web::delete().to(remove)),
    );
}
