//! Security-relevant events, logged with a fixed `event` field so they can
//! be filtered out of the request log.

use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

pub fn login_failed(reason: &str, email: &str) {
    warn!(
        event = "SECURITY_LOGIN_FAILED",
        trace_id = %trace_ctx::trace_id(),
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

pub fn session_rejected(reason: &str, path: &str) {
    info!(
        event = "SECURITY_SESSION_REJECTED",
        trace_id = %trace_ctx::trace_id(),
        reason,
        path,
        "Session cookie did not yield a session"
    );
}

pub fn access_denied(user_id: &str, path: &str) {
    warn!(
        event = "SECURITY_ACCESS_DENIED",
        trace_id = %trace_ctx::trace_id(),
        user_id,
        path,
        "Role gate denied access"
    );
}
