//! Role gate for page routes.
//!
//! Decides from the decoded session alone whether a page request may
//! proceed. Denials are always redirects, never error bodies. On allow the
//! session payload is stored in request extensions for the handler.

use std::time::SystemTime;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::auth::cookies::{session_from_cookie, SESSION_COOKIE};
use crate::auth::roles::{Capability, RoleCapabilitySet};
use crate::auth::session::{SessionPayload, UserType};
use crate::logging::security;
use crate::state::app_state::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
/// The one admin page reachable before the hotel and owner are approved.
pub const HOTEL_INFO_PATH: &str = "/admin/hotel-info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Login { redirect: String },
    Unauthorized,
    CompleteHotelInfo,
}

impl GateDecision {
    /// Redirect target, `None` for [`GateDecision::Allow`].
    pub fn location(&self) -> Option<String> {
        match self {
            GateDecision::Allow => None,
            GateDecision::Login { redirect } => Some(format!(
                "{LOGIN_PATH}?redirect={}",
                utf8_percent_encode(redirect, NON_ALPHANUMERIC)
            )),
            GateDecision::Unauthorized => Some(UNAUTHORIZED_PATH.to_string()),
            GateDecision::CompleteHotelInfo => Some(HOTEL_INFO_PATH.to_string()),
        }
    }
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Gate decision for `path` given the caller's session, if any.
///
/// `redirect_target` is what the login page should return to, normally the
/// path plus query string.
pub fn evaluate(path: &str, redirect_target: &str, session: Option<&SessionPayload>) -> GateDecision {
    let Some(session) = session else {
        return GateDecision::Login {
            redirect: redirect_target.to_string(),
        };
    };
    let identity = &session.identity;
    let caps = RoleCapabilitySet::for_user_type(identity.user_type);

    if under(path, "/superadmin") && !caps.allows(Capability::AccessSuperadmin) {
        return GateDecision::Unauthorized;
    }
    if under(path, "/admin") {
        if !caps.allows(Capability::AccessAdmin) {
            return GateDecision::Unauthorized;
        }
        let approved = identity.hotel_approved && identity.user_approved;
        if identity.user_type == UserType::Owner && !approved && path != HOTEL_INFO_PATH {
            return GateDecision::CompleteHotelInfo;
        }
    }
    GateDecision::Allow
}

pub struct RoleGate;

impl<S, B> Transform<S, ServiceRequest> for RoleGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RoleGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleGateMiddleware { service }))
    }
}

pub struct RoleGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RoleGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Without state every request is treated as signed out.
        let session = req.app_data::<web::Data<AppState>>().and_then(|state| {
            session_from_cookie(req.cookie(SESSION_COOKIE), &state.security, SystemTime::now()).ok()
        });

        let path = req.path().to_string();
        let target = req
            .uri()
            .path_and_query()
            .map_or_else(|| path.clone(), |pq| pq.as_str().to_string());
        let decision = evaluate(&path, &target, session.as_ref());

        match (decision.location(), session) {
            (None, Some(session)) => {
                req.extensions_mut().insert(session);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            (None, None) => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            (Some(location), session) => {
                if let (GateDecision::Unauthorized, Some(session)) = (&decision, &session) {
                    security::access_denied(&session.identity.id, &path);
                }
                let response = HttpResponse::Found()
                    .insert_header((header::LOCATION, location))
                    .insert_header((header::CACHE_CONTROL, "no-store"))
                    .finish();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}
