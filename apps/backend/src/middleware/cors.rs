use std::env;

use actix_cors::Cors;
use actix_web::http::header;

const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Origins from a comma-separated list; empty, `null` and non-http(s)
/// entries are dropped. Falls back to the local admin client.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();
    if origins.is_empty() {
        DEV_ORIGINS.iter().map(|s| s.to_string()).collect()
    } else {
        origins
    }
}

/// CORS for the admin client. Session cookies ride along, so origins are
/// listed explicitly (`CORS_ALLOWED_ORIGINS`) and credentials are allowed.
pub fn cors_middleware() -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()) {
        cors = cors.allowed_origin(&origin);
    }
    cors
}
