//! Shapes the gateway returns to the admin client.

use serde::Serialize;

use super::backend::BackendCurrency;
use crate::auth::roles::RoleCapabilitySet;
use crate::auth::session::{SessionIdentity, SessionPayload, UserType};
use crate::auth::storage_scope::ClientStorageScope;

/// The caller as exposed to the client. Never carries the backend token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub hotel_id: Option<String>,
    pub position: Option<String>,
    pub contact_number: Option<String>,
    pub user_approved: bool,
    pub hotel_approved: bool,
    pub user_type: UserType,
}

impl From<&SessionIdentity> for SessionUser {
    fn from(identity: &SessionIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            hotel_id: identity.hotel_id.clone(),
            position: identity.position.clone(),
            contact_number: identity.contact_number.clone(),
            user_approved: identity.user_approved,
            hotel_approved: identity.hotel_approved,
            user_type: identity.user_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTiming {
    /// Seconds since epoch
    pub expires_at: i64,
    /// Seconds from now
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub success: bool,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshView {
    pub success: bool,
    pub user: SessionUser,
    pub session: SessionTiming,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeView {
    pub user: SessionUser,
    pub capabilities: RoleCapabilitySet,
    pub storage_scope: ClientStorageScope,
}

impl MeView {
    pub fn for_session(session: &SessionPayload) -> Self {
        Self {
            user: SessionUser::from(&session.identity),
            capabilities: RoleCapabilitySet::for_user_type(session.identity.user_type),
            storage_scope: ClientStorageScope::for_session(session),
        }
    }
}

/// Context returned for gated page routes in place of rendered markup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub path: String,
    pub user: SessionUser,
    pub capabilities: RoleCapabilitySet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyView {
    pub code: String,
    pub name: String,
    pub symbol: Option<String>,
    pub country_code: Option<String>,
    pub flag_url: Option<String>,
}

impl CurrencyView {
    /// Attach a flag image URL derived from the currency's country.
    ///
    /// Falls back to the first two letters of the ISO 4217 code, which is
    /// the issuing country for national currencies (`EUR` → `eu`).
    pub fn from_backend(currency: BackendCurrency, flag_cdn_url: &str) -> Self {
        let country = currency
            .country_code
            .clone()
            .filter(|c| c.len() == 2)
            .or_else(|| {
                let code = currency.code.trim();
                (code.len() == 3 && code.is_ascii()).then(|| code[..2].to_string())
            })
            .map(|c| c.to_ascii_lowercase());

        Self {
            flag_url: country
                .as_ref()
                .map(|c| format!("{}/{c}.png", flag_cdn_url.trim_end_matches('/'))),
            code: currency.code,
            name: currency.name,
            symbol: currency.symbol,
            country_code: country,
        }
    }
}
