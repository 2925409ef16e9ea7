//! Process configuration read from the environment at startup.

use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Default lifetime of a regular session, in seconds.
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 30 * 60;
/// Lifetime of a superadmin session, in seconds.
pub const SUPERADMIN_SESSION_MAX_AGE_SECS: u64 = 24 * 60 * 60;
/// Upper bound accepted for `SESSION_MAX_AGE`.
pub const MAX_SESSION_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_APPROVAL_CHECK_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_FLAG_CDN_URL: &str = "https://flagcdn.com/w40";

/// Runtime environment; only `Production` turns on `Secure` cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Production,
}

impl RuntimeEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => RuntimeEnv::Production,
            _ => RuntimeEnv::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: RuntimeEnv,
    /// Base URL of the external hotel-management API, without trailing slash
    pub backend_api_url: String,
    pub session_secret: Vec<u8>,
    pub session_max_age: Duration,
    pub backend_timeout: Duration,
    pub approval_check_timeout: Duration,
    pub flag_cdn_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `SESSION_SECRET` and `BACKEND_API_URL` are required; everything else
    /// has a default.
    pub fn from_env() -> Result<Self, AppError> {
        let session_secret = must_var("SESSION_SECRET")?;
        if session_secret.trim().is_empty() {
            return Err(AppError::config("SESSION_SECRET must not be empty"));
        }

        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::config("BACKEND_PORT must be a valid port number"))?,
            Err(_) => 3001,
        };

        Ok(Self {
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            env: RuntimeEnv::parse(&env::var("APP_ENV").unwrap_or_default()),
            backend_api_url: normalize_base_url(&must_var("BACKEND_API_URL")?)?,
            session_secret: session_secret.into_bytes(),
            session_max_age: Duration::from_secs(bounded_u64_var(
                "SESSION_MAX_AGE",
                DEFAULT_SESSION_MAX_AGE_SECS,
                MAX_SESSION_MAX_AGE_SECS,
            )?),
            backend_timeout: Duration::from_millis(u64_var(
                "BACKEND_TIMEOUT_MS",
                DEFAULT_BACKEND_TIMEOUT_MS,
            )?),
            approval_check_timeout: Duration::from_millis(u64_var(
                "APPROVAL_CHECK_TIMEOUT_MS",
                DEFAULT_APPROVAL_CHECK_TIMEOUT_MS,
            )?),
            flag_cdn_url: env::var("FLAG_CDN_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_FLAG_CDN_URL.to_string()),
        })
    }

    /// Configuration pointing at `backend_api_url`, with defaults elsewhere.
    pub fn for_backend(backend_api_url: &str, session_secret: &[u8]) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            env: RuntimeEnv::Development,
            backend_api_url: backend_api_url.trim_end_matches('/').to_string(),
            session_secret: session_secret.to_vec(),
            session_max_age: Duration::from_secs(DEFAULT_SESSION_MAX_AGE_SECS),
            backend_timeout: Duration::from_millis(DEFAULT_BACKEND_TIMEOUT_MS),
            approval_check_timeout: Duration::from_millis(DEFAULT_APPROVAL_CHECK_TIMEOUT_MS),
            flag_cdn_url: DEFAULT_FLAG_CDN_URL.to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == RuntimeEnv::Production
    }
}

fn normalize_base_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AppError::config(format!(
            "BACKEND_API_URL must be an http(s) URL, got '{trimmed}'"
        )));
    }
    Ok(trimmed.to_string())
}

fn u64_var(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| AppError::config(format!("{name} must be a positive integer"))),
        Err(_) => Ok(default),
    }
}

fn bounded_u64_var(name: &str, default: u64, max: u64) -> Result<u64, AppError> {
    let value = u64_var(name, default)?;
    if value > max {
        return Err(AppError::config(format!("{name} must be at most {max}")));
    }
    Ok(value)
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::config(format!("{name} must be set")))
}
