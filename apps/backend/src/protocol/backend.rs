//! Shapes returned by the hotel backend.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::auth::session::UserType;

/// Backend ids arrive as numbers or strings; we carry them as strings.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected id, got {other}"))),
    }
}

fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected id, got {other}"))),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub hotel_id: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    pub user_type: UserType,
    #[serde(default)]
    pub user_approved: bool,
    #[serde(default)]
    pub hotel_approved: bool,
}

/// Body of a successful `/auth/login` or `/superadmin/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendLogin {
    pub token: String,
    pub user: BackendUser,
}

/// Body of `/hotel/approval-status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStatus {
    #[serde(alias = "approved")]
    pub hotel_approved: bool,
    #[serde(default)]
    pub user_approved: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendCurrency {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Lists come back either bare or wrapped in `{ "data": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}
