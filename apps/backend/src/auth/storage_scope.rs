//! Binding of browser-local data to the session that wrote it.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::session::{unix_seconds, SessionPayload};

/// Scope metadata the client stores next to its cached data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStorageScope {
    pub user_id: String,
    pub hotel_id: Option<String>,
    /// Seconds since epoch; mirrors the session expiry
    pub expires_at: i64,
}

/// Outcome of checking a stored scope against the live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeCheck {
    Valid,
    /// Scoped data belongs to someone else or outlived its session
    Purge,
}

impl ClientStorageScope {
    pub fn for_session(session: &SessionPayload) -> Self {
        Self {
            user_id: session.identity.id.clone(),
            hotel_id: session.identity.hotel_id.clone(),
            expires_at: session.exp,
        }
    }

    pub fn validate(&self, current: Option<&SessionPayload>, now: SystemTime) -> ScopeCheck {
        let Some(session) = current else {
            return ScopeCheck::Purge;
        };
        let expired = unix_seconds(now).map_or(true, |now| self.expires_at <= now);
        if expired || self.user_id != session.identity.id {
            ScopeCheck::Purge
        } else {
            ScopeCheck::Valid
        }
    }
}
