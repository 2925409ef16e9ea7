//! Shared plumbing for handlers that forward to the hotel-management API.

use std::time::Duration;

use actix_web::http::header::{self, CacheControl, CacheDirective};
use actix_web::{web, HttpRequest, HttpResponse};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::infra::backend_api::OutboundBody;

/// Caching policy for a proxied response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    NoStore,
    /// `public, s-maxage=<ttl>` for shared reference data
    Shared(Duration),
}

impl CachePolicy {
    fn header(self) -> CacheControl {
        match self {
            CachePolicy::NoStore => CacheControl(vec![CacheDirective::NoStore]),
            CachePolicy::Shared(ttl) => CacheControl(vec![
                CacheDirective::Public,
                CacheDirective::Extension("s-maxage".to_string(), Some(ttl.as_secs().to_string())),
            ]),
        }
    }
}

pub fn json_response<T: Serialize + ?Sized>(body: &T, policy: CachePolicy) -> HttpResponse {
    HttpResponse::Ok().insert_header(policy.header()).json(body)
}

/// Query string as ordered pairs. `token` is dropped so a caller cannot
/// override the backend token the gateway attaches.
pub fn query_pairs(req: &HttpRequest) -> Result<Vec<(String, String)>, AppError> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map_err(|_| AppError::invalid(ErrorCode::InvalidQuery, "Malformed query string"))?
        .into_inner();
    Ok(pairs.into_iter().filter(|(name, _)| name != "token").collect())
}

/// A single query value, ignoring blanks.
pub fn query_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(n, v)| n == name && !v.trim().is_empty())
        .map(|(_, v)| v.trim().to_string())
}

/// Encode a caller-supplied id for use as one backend path segment.
pub fn path_segment(id: &str) -> String {
    utf8_percent_encode(id, NON_ALPHANUMERIC).to_string()
}

/// Request body as it should go to the backend.
///
/// Multipart bodies pass through untouched with their boundary; anything
/// else must be JSON.
pub fn outbound_body(req: &HttpRequest, body: Bytes) -> Result<OutboundBody, AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.to_ascii_lowercase().starts_with("multipart/") {
        return Ok(OutboundBody::Raw {
            content_type,
            bytes: body,
        });
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(OutboundBody::Empty);
    }
    let value = serde_json::from_slice(&body)
        .map_err(|_| AppError::invalid(ErrorCode::InvalidJson, "Request body must be valid JSON"))?;
    Ok(OutboundBody::Json(value))
}
