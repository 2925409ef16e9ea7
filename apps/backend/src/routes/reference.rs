//! Cached reference data: currencies and lookup tables.

use actix_web::{web, HttpRequest, HttpResponse};

use super::proxy::{json_response, query_pairs, CachePolicy};
use crate::error::AppError;
use crate::extractors::session::CurrentSession;
use crate::services::reference_data::{self, CURRENCIES_TTL, LOOKUP_TTL};
use crate::state::app_state::AppState;

async fn currencies(
    session: CurrentSession,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let value = reference_data::currencies(
        &app_state.backend,
        &app_state.cache,
        &session,
        &app_state.config.flag_cdn_url,
    )
    .await?;
    Ok(json_response(&*value, CachePolicy::Shared(CURRENCIES_TTL)))
}

async fn lookup(
    session: CurrentSession,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let params = query_pairs(&req)?;
    let value = reference_data::lookup(&app_state.backend, &app_state.cache, &session, &params).await?;
    Ok(json_response(&*value, CachePolicy::Shared(LOOKUP_TTL)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/currencies").route(web::get().to(currencies)))
        .service(web::resource("/lookup").route(web::get().to(lookup)));
}
