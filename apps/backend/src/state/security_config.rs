use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::config::app::{
    AppConfig, DEFAULT_SESSION_MAX_AGE_SECS, SUPERADMIN_SESSION_MAX_AGE_SECS,
};

/// Session signing and cookie settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Secret used to sign and verify session tokens
    pub session_secret: Vec<u8>,
    /// Signing algorithm (HS256)
    pub algorithm: Algorithm,
    /// Lifetime of owner/worker sessions
    pub session_ttl: Duration,
    /// Lifetime of superadmin sessions
    pub superadmin_session_ttl: Duration,
    /// Mark cookies `Secure`
    pub secure_cookies: bool,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given secret and default lifetimes
    pub fn new(session_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            session_secret: session_secret.into(),
            algorithm: Algorithm::HS256,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_MAX_AGE_SECS),
            superadmin_session_ttl: Duration::from_secs(SUPERADMIN_SESSION_MAX_AGE_SECS),
            secure_cookies: false,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            session_ttl: config.session_max_age,
            secure_cookies: config.is_production(),
            ..Self::new(config.session_secret.clone())
        }
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
