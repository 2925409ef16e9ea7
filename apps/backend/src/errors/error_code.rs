//! Error codes for the hotel gateway API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Codes are lowercase, dot-separated (`area.reason`) and map 1:1 to the
//! `code` field of the JSON error envelope.

use core::fmt;

/// Centralized error codes for the gateway API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No session cookie, or it did not decode
    AuthRequired,
    /// Session token has expired
    AuthExpired,
    /// Session token is malformed or its signature does not verify
    AuthInvalid,
    /// Backend rejected the email/password pair
    InvalidCredentials,
    /// Account is not a superadmin account
    NotSuperAdmin,

    // Request Validation
    /// Required field missing or empty
    MissingField,
    /// Request body is not valid JSON for the expected shape
    InvalidJson,
    /// Query parameter missing or malformed
    InvalidQuery,
    /// General validation error
    ValidationFailed,

    // Resource Not Found
    NotFound,

    // Backend
    /// Backend answered with a non-2xx status
    BackendError,
    /// Backend could not be reached or timed out
    BackendUnavailable,
    /// Backend answered 2xx with a body we could not interpret
    BackendInvalidResponse,

    // System Errors
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AuthRequired => "auth.required",
            Self::AuthExpired => "auth.expired",
            Self::AuthInvalid => "auth.invalid",
            Self::InvalidCredentials => "auth.credentials",
            Self::NotSuperAdmin => "auth.not_superadmin",

            Self::MissingField => "validation.missing_field",
            Self::InvalidJson => "validation.invalid_json",
            Self::InvalidQuery => "validation.invalid_query",
            Self::ValidationFailed => "validation.failed",

            Self::NotFound => "not_found",

            Self::BackendError => "backend.error",
            Self::BackendUnavailable => "backend.unavailable",
            Self::BackendInvalidResponse => "backend.invalid_response",

            Self::Internal => "internal",
            Self::ConfigError => "config",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
