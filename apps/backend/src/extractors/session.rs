use std::time::SystemTime;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::cookies::{session_from_cookie, SESSION_COOKIE};
use crate::auth::roles::{Capability, RoleCapabilitySet};
use crate::auth::session::{SessionPayload, SessionRejection};
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

/// The caller's decoded session. Rejects with `401` when the session cookie
/// is missing, tampered with or expired; no backend call is made first.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionPayload);

impl CurrentSession {
    pub fn into_inner(self) -> SessionPayload {
        self.0
    }

    pub fn backend_token(&self) -> &str {
        &self.0.identity.backend_token
    }
}

impl std::ops::Deref for CurrentSession {
    type Target = SessionPayload;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub(crate) fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))
}

/// Session for `req`, or the reason there is none.
pub fn resolve_session(req: &HttpRequest) -> Result<Result<SessionPayload, SessionRejection>, AppError> {
    let state = app_state(req)?;
    let cookie = req.cookie(SESSION_COOKIE);
    let had_cookie = cookie.is_some();
    let resolved = session_from_cookie(cookie, &state.security, SystemTime::now());
    if let Err(reason) = &resolved {
        if had_cookie {
            let reason = match reason {
                SessionRejection::Expired => "expired",
                SessionRejection::Invalid => "invalid",
            };
            security::session_rejected(reason, req.path());
        }
    }
    Ok(resolved)
}

impl FromRequest for CurrentSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = resolve_session(req).and_then(|resolved| {
            resolved
                .map(CurrentSession)
                .map_err(|_| AppError::unauthorized())
        });
        ready(session)
    }
}

/// A session whose user type grants superadmin access; `403` otherwise.
#[derive(Debug, Clone)]
pub struct SuperAdminSession(pub SessionPayload);

impl SuperAdminSession {
    pub fn backend_token(&self) -> &str {
        &self.0.identity.backend_token
    }
}

impl FromRequest for SuperAdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let result = CurrentSession::from_request(req, payload)
            .into_inner()
            .and_then(|CurrentSession(session)| {
                let caps = RoleCapabilitySet::for_user_type(session.identity.user_type);
                if caps.allows(Capability::AccessSuperadmin) {
                    Ok(SuperAdminSession(session))
                } else {
                    security::access_denied(&session.identity.id, req.path());
                    Err(AppError::not_superadmin())
                }
            });
        ready(result)
    }
}
