//! Session payload and its token codec.
//!
//! Tokens are HS256 JWTs signed with the configured session secret. Decoding
//! checks the signature, the payload shape and expiry against a caller-supplied
//! clock; any failure means "no session".

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Account kind as reported by the hotel backend (small integer on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UserType {
    SuperAdmin = 1,
    Owner = 2,
    Worker = 3,
}

impl TryFrom<u8> for UserType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UserType::SuperAdmin),
            2 => Ok(UserType::Owner),
            3 => Ok(UserType::Worker),
            other => Err(format!("unknown user type {other}")),
        }
    }
}

impl From<UserType> for u8 {
    fn from(value: UserType) -> Self {
        value as u8
    }
}

/// Identity fields carried by a session; everything except the timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Opaque credential issued by the hotel backend, replayed on proxied calls
    pub backend_token: String,
    #[serde(default)]
    pub hotel_id: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    pub user_approved: bool,
    pub hotel_approved: bool,
    pub user_type: UserType,
}

/// The authenticated identity stored in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(flatten)]
    pub identity: SessionIdentity,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Why a token did not yield a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    /// Well-formed and authentic, but past its expiry
    Expired,
    /// Malformed, unsigned/forged, or carrying an impossible payload
    Invalid,
}

impl From<SessionRejection> for AppError {
    fn from(rejection: SessionRejection) -> Self {
        match rejection {
            SessionRejection::Expired => AppError::unauthorized_expired(),
            SessionRejection::Invalid => AppError::unauthorized_invalid(),
        }
    }
}

pub fn unix_seconds(now: SystemTime) -> Result<i64, AppError> {
    now.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
        .ok_or_else(|| AppError::internal("system clock is outside the supported range"))
}

impl SessionPayload {
    /// Wrap `identity` in a payload valid from `now` for `ttl`.
    pub fn issue(identity: SessionIdentity, now: SystemTime, ttl: Duration) -> Result<Self, AppError> {
        let ttl_secs = i64::try_from(ttl.as_secs())
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| AppError::internal("session ttl must be a positive number of seconds"))?;
        let iat = unix_seconds(now)?;
        let exp = iat
            .checked_add(ttl_secs)
            .ok_or_else(|| AppError::internal("session expiry overflows"))?;
        Ok(Self { identity, iat, exp })
    }

    /// Seconds between issue and expiry; used as the cookie `Max-Age`.
    pub fn ttl_secs(&self) -> i64 {
        self.exp - self.iat
    }

    pub fn is_superadmin(&self) -> bool {
        self.identity.user_type == UserType::SuperAdmin
    }
}

/// Sign `payload` into a compact token.
pub fn encode_session(payload: &SessionPayload, security: &SecurityConfig) -> Result<String, AppError> {
    encode(
        &Header::new(security.algorithm),
        payload,
        &EncodingKey::from_secret(&security.session_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
}

/// Decode a token, reporting why it was rejected.
pub fn decode_session_checked(
    token: &str,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<SessionPayload, SessionRejection> {
    // Expiry is checked below against `now` with no leeway.
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;

    let payload = decode::<SessionPayload>(
        token,
        &DecodingKey::from_secret(&security.session_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| SessionRejection::Invalid)?;

    if payload.exp <= payload.iat {
        return Err(SessionRejection::Invalid);
    }
    let now = unix_seconds(now).map_err(|_| SessionRejection::Invalid)?;
    if payload.exp <= now {
        return Err(SessionRejection::Expired);
    }
    Ok(payload)
}

/// Decode a token; `None` for anything that is not a live, authentic session.
pub fn decode_session(token: &str, security: &SecurityConfig, now: SystemTime) -> Option<SessionPayload> {
    decode_session_checked(token, security, now).ok()
}
