//! Owner-side resources that use bearer auth: the hotel profile and its
//! workers.

use actix_web::{web, HttpRequest, HttpResponse};
use bytes::Bytes;

use super::proxy::{json_response, outbound_body, query_pairs, CachePolicy};
use crate::error::AppError;
use crate::extractors::session::CurrentSession;
use crate::infra::backend_api::{BackendRequest, TokenPlacement};
use crate::state::app_state::AppState;

/// Hotel creation may carry photos.
const UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

async fn forward_get(
    path: &'static str,
    session: &CurrentSession,
    req: &HttpRequest,
    app_state: &AppState,
) -> Result<HttpResponse, AppError> {
    let mut request = BackendRequest::get(path);
    for (name, value) in query_pairs(req)? {
        request = request.query(name, value);
    }
    let request = request.authorized(session.backend_token(), TokenPlacement::Bearer);
    let value = app_state.backend.send(request).await?;
    Ok(json_response(&value, CachePolicy::NoStore))
}

async fn forward_post(
    path: &'static str,
    session: &CurrentSession,
    req: &HttpRequest,
    body: Bytes,
    app_state: &AppState,
) -> Result<HttpResponse, AppError> {
    let request = BackendRequest::post(path)
        .body(outbound_body(req, body)?)
        .authorized(session.backend_token(), TokenPlacement::Bearer);
    let value = app_state.backend.send(request).await?;
    Ok(json_response(&value, CachePolicy::NoStore))
}

async fn get_hotel(
    session: CurrentSession,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    forward_get("/hotel", &session, &req, &app_state).await
}

async fn create_hotel(
    session: CurrentSession,
    req: HttpRequest,
    body: Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    forward_post("/hotel", &session, &req, body, &app_state).await
}

async fn list_workers(
    session: CurrentSession,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    forward_get("/workers", &session, &req, &app_state).await
}

async fn create_worker(
    session: CurrentSession,
    req: HttpRequest,
    body: Bytes,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    forward_post("/workers", &session, &req, body, &app_state).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/hotel")
            .app_data(web::PayloadConfig::new(UPLOAD_LIMIT))
            .route(web::get().to(get_hotel))
            .route(web::post().to(create_hotel)),
    )
    .service(
        web::resource("/workers")
            .route(web::get().to(list_workers))
            .route(web::post().to(create_worker)),
    );
}
