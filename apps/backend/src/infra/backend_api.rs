//! HTTP client for the external hotel-management API.
//!
//! Every proxied call goes through [`BackendApi::send`], which attaches the
//! caller's backend token, forwards the trace id and maps failures onto
//! `AppError` so handlers never see a raw upstream body.

use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::trace_ctx;

/// Upper bound on the backend message we pass through in `details`.
const MAX_DETAIL_LEN: usize = 200;

/// Where the backend token goes on the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPlacement {
    /// `?token=<backend token>`
    Query,
    /// `Authorization: Bearer <backend token>`
    Bearer,
}

#[derive(Debug, Clone)]
pub enum OutboundBody {
    Empty,
    Json(Value),
    /// Body forwarded byte-for-byte, e.g. multipart uploads
    Raw { content_type: String, bytes: Bytes },
}

/// One request to the backend, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: OutboundBody,
    token: Option<(String, TokenPlacement)>,
}

impl BackendRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: OutboundBody::Empty,
            token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn query<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = OutboundBody::Json(body);
        self
    }

    pub fn body(mut self, body: OutboundBody) -> Self {
        self.body = body;
        self
    }

    pub fn authorized(mut self, backend_token: &str, placement: TokenPlacement) -> Self {
        self.token = Some((backend_token.to_string(), placement));
        self
    }
}

#[derive(Debug, Clone)]
pub struct BackendApi {
    http: reqwest::Client,
    base_url: String,
}

impl BackendApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &BackendRequest) -> Result<reqwest::Url, AppError> {
        let raw = format!("{}/{}", self.base_url, request.path.trim_start_matches('/'));
        let mut url = reqwest::Url::parse(&raw)
            .map_err(|e| AppError::internal(format!("invalid backend url '{raw}': {e}")))?;

        let token_in_query = match &request.token {
            Some((token, TokenPlacement::Query)) => Some(token.as_str()),
            _ => None,
        };
        if !request.query.is_empty() || token_in_query.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
            if let Some(token) = token_in_query {
                pairs.append_pair("token", token);
            }
        }
        Ok(url)
    }

    /// Send `request` and return the JSON body of a 2xx response.
    ///
    /// An empty 2xx body yields `Value::Null`.
    pub async fn send(&self, request: BackendRequest) -> Result<Value, AppError> {
        let url = self.url_for(&request)?;
        let mut builder = self.http.request(request.method.clone(), url);

        if let Some((token, TokenPlacement::Bearer)) = &request.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(trace_id) = trace_ctx::current() {
            builder = builder.header("x-request-id", trace_id);
        }
        builder = match request.body {
            OutboundBody::Empty => builder,
            OutboundBody::Json(ref body) => builder.json(body),
            OutboundBody::Raw {
                ref content_type,
                ref bytes,
            } => builder
                .header(CONTENT_TYPE, content_type.as_str())
                .body(bytes.clone()),
        };

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            let timed_out = e.is_timeout();
            // Query-string tokens must not reach the logs.
            let e = e.without_url();
            warn!(
                backend.method = %request.method,
                backend.path = %request.path,
                timeout = timed_out,
                error = %e,
                "backend request failed"
            );
            AppError::backend_unavailable(format!("{} {}: {e}", request.method, request.path))
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let body = response.bytes().await.map_err(|e| {
            AppError::backend_unavailable(format!("reading backend body: {}", e.without_url()))
        })?;

        debug!(
            backend.method = %request.method,
            backend.path = %request.path,
            backend.status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "backend responded"
        );

        if !status.is_success() {
            warn!(
                backend.method = %request.method,
                backend.path = %request.path,
                backend.status = status.as_u16(),
                "backend returned an error status"
            );
            return Err(AppError::backend(status, extract_message(&body)));
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body)
            .map_err(|e| AppError::backend_invalid_response(format!("{}: {e}", request.path)))
    }

    /// Send `request` and deserialize the 2xx body into `T`.
    pub async fn send_as<T: DeserializeOwned>(&self, request: BackendRequest) -> Result<T, AppError> {
        let path = request.path.clone();
        let value = self.send(request).await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::backend_invalid_response(format!("{path}: {e}")))
    }
}

/// Short human message from an error body: a `message` or `error` string,
/// first line only, length-capped. Anything else is dropped.
fn extract_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))?;
    let first_line = message.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return None;
    }
    Some(first_line.chars().take(MAX_DETAIL_LEN).collect())
}
