//! Cookie-backed session store.
//!
//! The httpOnly `session_token` cookie is the source of truth. The three
//! mirror cookies only exist so client code can branch on role/approval
//! without a round trip; nothing server-side reads them.

use std::time::SystemTime;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpResponseBuilder;

use super::session::{decode_session_checked, SessionPayload, SessionRejection};
use crate::state::security_config::SecurityConfig;

pub const SESSION_COOKIE: &str = "session_token";
pub const USER_TYPE_COOKIE: &str = "user_type";
pub const USER_APPROVED_COOKIE: &str = "user_approved";
pub const HOTEL_APPROVED_COOKIE: &str = "hotel_approved";

const MIRROR_COOKIES: [&str; 3] = [USER_TYPE_COOKIE, USER_APPROVED_COOKIE, HOTEL_APPROVED_COOKIE];

fn base_cookie(
    name: &'static str,
    value: String,
    http_only: bool,
    max_age_secs: i64,
    security: &SecurityConfig,
) -> Cookie<'static> {
    Cookie::build(name, value)
        .http_only(http_only)
        .secure(security.secure_cookies)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

/// Session cookie plus its mirrors, all living as long as the token.
pub fn auth_cookies(token: &str, payload: &SessionPayload, security: &SecurityConfig) -> Vec<Cookie<'static>> {
    let max_age = payload.ttl_secs();
    let identity = &payload.identity;
    vec![
        base_cookie(SESSION_COOKIE, token.to_string(), true, max_age, security),
        base_cookie(
            USER_TYPE_COOKIE,
            u8::from(identity.user_type).to_string(),
            false,
            max_age,
            security,
        ),
        base_cookie(
            USER_APPROVED_COOKIE,
            identity.user_approved.to_string(),
            false,
            max_age,
            security,
        ),
        base_cookie(
            HOTEL_APPROVED_COOKIE,
            identity.hotel_approved.to_string(),
            false,
            max_age,
            security,
        ),
    ]
}

/// Empty, already-expired versions of every session cookie.
pub fn cleared_cookies(security: &SecurityConfig) -> Vec<Cookie<'static>> {
    std::iter::once((SESSION_COOKIE, true))
        .chain(MIRROR_COOKIES.iter().map(|name| (*name, false)))
        .map(|(name, http_only)| base_cookie(name, String::new(), http_only, 0, security))
        .collect()
}

pub fn set_auth_cookies(
    builder: &mut HttpResponseBuilder,
    token: &str,
    payload: &SessionPayload,
    security: &SecurityConfig,
) {
    for cookie in auth_cookies(token, payload, security) {
        builder.cookie(cookie);
    }
}

pub fn clear_auth_cookies(builder: &mut HttpResponseBuilder, security: &SecurityConfig) {
    for cookie in cleared_cookies(security) {
        builder.cookie(cookie);
    }
}

/// Decode the session carried by a request's session cookie.
pub fn session_from_cookie(
    cookie: Option<Cookie<'_>>,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<SessionPayload, SessionRejection> {
    let cookie = cookie.ok_or(SessionRejection::Invalid)?;
    if cookie.value().is_empty() {
        return Err(SessionRejection::Invalid);
    }
    decode_session_checked(cookie.value(), security, now)
}

/// The caller's session, or `None` when the cookie is missing, cleared,
/// tampered with or expired.
pub fn get_auth_token(
    req: &actix_web::HttpRequest,
    security: &SecurityConfig,
    now: SystemTime,
) -> Option<SessionPayload> {
    session_from_cookie(req.cookie(SESSION_COOKIE), security, now).ok()
}
