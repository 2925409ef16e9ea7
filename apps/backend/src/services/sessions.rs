//! Credential exchange and session refresh.

use std::time::{Duration, SystemTime};

use actix_web::http::StatusCode;
use tracing::{info, warn};

use crate::auth::session::{encode_session, SessionIdentity, SessionPayload, UserType};
use crate::error::AppError;
use crate::infra::backend_api::{BackendApi, BackendRequest, TokenPlacement};
use crate::logging::pii::Redacted;
use crate::protocol::backend::{ApprovalStatus, BackendLogin};
use crate::state::security_config::SecurityConfig;

/// Which login endpoint a credential exchange targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    Regular,
    SuperAdmin,
}

impl LoginKind {
    fn backend_path(self) -> &'static str {
        match self {
            LoginKind::Regular => "/auth/login",
            LoginKind::SuperAdmin => "/superadmin/login",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Trimmed email and password; `400` if either is missing.
    pub fn new(email: Option<&str>, password: Option<&str>) -> Result<Self, AppError> {
        let email = email.map(str::trim).unwrap_or_default();
        let password = password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::missing_field("Email and password are required"));
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// A freshly signed session and its token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub payload: SessionPayload,
    pub token: String,
}

/// Session lifetime for a user type.
pub fn ttl_for(user_type: UserType, security: &SecurityConfig) -> Duration {
    match user_type {
        UserType::SuperAdmin => security.superadmin_session_ttl,
        UserType::Owner | UserType::Worker => security.session_ttl,
    }
}

fn issue(
    identity: SessionIdentity,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<IssuedSession, AppError> {
    let ttl = ttl_for(identity.user_type, security);
    let payload = SessionPayload::issue(identity, now, ttl)?;
    let token = encode_session(&payload, security)?;
    Ok(IssuedSession { payload, token })
}

/// Exchange credentials with the backend and sign a session for the result.
pub async fn login(
    api: &BackendApi,
    security: &SecurityConfig,
    credentials: &Credentials,
    kind: LoginKind,
    now: SystemTime,
) -> Result<IssuedSession, AppError> {
    let request = BackendRequest::post(kind.backend_path()).json(serde_json::json!({
        "email": credentials.email,
        "password": credentials.password,
    }));

    let login: BackendLogin = api.send_as(request).await.map_err(|e| match e {
        AppError::Backend { status, .. }
            if matches!(
                status,
                StatusCode::BAD_REQUEST
                    | StatusCode::UNAUTHORIZED
                    | StatusCode::FORBIDDEN
                    | StatusCode::NOT_FOUND
            ) =>
        {
            AppError::invalid_credentials()
        }
        other => other,
    })?;

    let user = login.user;
    if kind == LoginKind::SuperAdmin && user.user_type != UserType::SuperAdmin {
        warn!(email = %Redacted(&credentials.email), "non-superadmin account used superadmin login");
        return Err(AppError::not_superadmin());
    }
    if login.token.trim().is_empty() {
        return Err(AppError::backend_invalid_response("login returned an empty token"));
    }

    let identity = SessionIdentity {
        id: user.id,
        email: user.email,
        name: user.name,
        backend_token: login.token,
        hotel_id: user.hotel_id,
        position: user.position,
        contact_number: user.contact_number,
        user_approved: user.user_approved,
        hotel_approved: user.hotel_approved,
        user_type: user.user_type,
    };

    let issued = issue(identity, security, now)?;
    info!(
        user_id = %issued.payload.identity.id,
        email = %Redacted(&issued.payload.identity.email),
        user_type = u8::from(issued.payload.identity.user_type),
        hotel_approved = issued.payload.identity.hotel_approved,
        "session issued"
    );
    Ok(issued)
}

/// Ask the backend for the current approval flags, waiting at most
/// `timeout`. `None` means "keep what the session already says".
pub async fn fetch_approval(
    api: &BackendApi,
    session: &SessionPayload,
    timeout: Duration,
) -> Option<ApprovalStatus> {
    session.identity.hotel_id.as_ref()?;

    let request = BackendRequest::get("/hotel/approval-status")
        .authorized(&session.identity.backend_token, TokenPlacement::Bearer);

    match tokio::time::timeout(timeout, api.send_as::<ApprovalStatus>(request)).await {
        Ok(Ok(status)) => Some(status),
        Ok(Err(e)) => {
            warn!(user_id = %session.identity.id, error = %e, "approval check failed; keeping previous value");
            None
        }
        Err(_) => {
            warn!(
                user_id = %session.identity.id,
                timeout_ms = timeout.as_millis() as u64,
                "approval check timed out; keeping previous value"
            );
            None
        }
    }
}

/// Re-issue `current` with fresh timestamps and refreshed approval flags.
pub async fn refresh(
    api: &BackendApi,
    security: &SecurityConfig,
    current: SessionPayload,
    approval_timeout: Duration,
    now: SystemTime,
) -> Result<IssuedSession, AppError> {
    let mut identity = current.identity.clone();
    if let Some(status) = fetch_approval(api, &current, approval_timeout).await {
        identity.hotel_approved = status.hotel_approved;
        if let Some(user_approved) = status.user_approved {
            identity.user_approved = user_approved;
        }
    }
    issue(identity, security, now)
}
