//! Gated page routes. The admin client renders the pages; the gateway only
//! decides access and returns the context a page needs.

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};

use crate::auth::roles::RoleCapabilitySet;
use crate::auth::session::SessionPayload;
use crate::error::AppError;
use crate::middleware::route_gate::RoleGate;
use crate::protocol::views::{PageContext, SessionUser};

pub const GATED_SCOPES: [&str; 3] = ["/admin", "/superadmin", "/user"];

async fn page(req: HttpRequest) -> Result<HttpResponse, AppError> {
    // RoleGate only lets requests through with a session attached.
    let session = req
        .extensions()
        .get::<SessionPayload>()
        .cloned()
        .ok_or_else(AppError::unauthorized)?;

    Ok(HttpResponse::Ok().json(PageContext {
        path: req.path().to_string(),
        user: SessionUser::from(&session.identity),
        capabilities: RoleCapabilitySet::for_user_type(session.identity.user_type),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    for scope in GATED_SCOPES {
        cfg.service(
            web::scope(scope)
                .wrap(RoleGate)
                .default_service(web::to(page)),
        );
    }
}
