use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::ErrorCode;
use crate::trace_ctx;

/// JSON error envelope returned by every handler.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Unauthorized: {code}")]
    Unauthorized { code: ErrorCode },
    #[error("Forbidden: {code}")]
    Forbidden { code: ErrorCode },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Backend error ({status}): {details:?}")]
    Backend {
        status: StatusCode,
        details: Option<String>,
    },
    #[error("Backend unavailable: {detail}")]
    BackendUnavailable { detail: String },
    #[error("Backend returned an unreadable response: {detail}")]
    BackendInvalidResponse { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::Unauthorized { code } => *code,
            AppError::Forbidden { code } => *code,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Backend { .. } => ErrorCode::BackendError,
            AppError::BackendUnavailable { .. } => ErrorCode::BackendUnavailable,
            AppError::BackendInvalidResponse { .. } => ErrorCode::BackendInvalidResponse,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Client-facing message. Backend and internal failures get a fixed
    /// message so upstream bodies never reach the caller verbatim.
    fn message(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::Unauthorized { code } => match code {
                ErrorCode::AuthExpired => "Session expired".to_string(),
                ErrorCode::AuthInvalid => "Invalid session".to_string(),
                ErrorCode::InvalidCredentials => "Invalid email or password".to_string(),
                _ => "Authentication required".to_string(),
            },
            AppError::Forbidden { code } => match code {
                ErrorCode::NotSuperAdmin => "Superadmin access required".to_string(),
                _ => "Access denied".to_string(),
            },
            AppError::NotFound { detail } => detail.clone(),
            AppError::Backend { .. } => "Backend request failed".to_string(),
            AppError::BackendUnavailable { .. } => "Backend unavailable".to_string(),
            AppError::BackendInvalidResponse { .. } => "Backend request failed".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
            AppError::Config { .. } => "Server misconfigured".to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::Backend { details, .. } => details.clone(),
            _ => None,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Backend { status, .. } => {
                if status.is_client_error() || status.is_server_error() {
                    *status
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            AppError::BackendUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AppError::BackendInvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn missing_field(detail: impl Into<String>) -> Self {
        Self::invalid(ErrorCode::MissingField, detail)
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            code: ErrorCode::AuthRequired,
        }
    }

    pub fn unauthorized_expired() -> Self {
        Self::Unauthorized {
            code: ErrorCode::AuthExpired,
        }
    }

    pub fn unauthorized_invalid() -> Self {
        Self::Unauthorized {
            code: ErrorCode::AuthInvalid,
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::Unauthorized {
            code: ErrorCode::InvalidCredentials,
        }
    }

    pub fn not_superadmin() -> Self {
        Self::Forbidden {
            code: ErrorCode::NotSuperAdmin,
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn backend(status: StatusCode, details: Option<String>) -> Self {
        Self::Backend { status, details }
    }

    pub fn backend_unavailable(detail: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            detail: detail.into(),
        }
    }

    pub fn backend_invalid_response(detail: impl Into<String>) -> Self {
        Self::BackendInvalidResponse {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(error = %self, code = %self.code(), "request failed");
        }

        let body = ErrorBody {
            error: self.message(),
            code: self.code().to_string(),
            details: self.details(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .insert_header(("x-trace-id", trace_id))
            .insert_header(("cache-control", "no-store"))
            .json(body)
    }
}
