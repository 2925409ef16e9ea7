//! Read-mostly reference data (currencies, lookup tables) served through the
//! process cache.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::auth::session::SessionPayload;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::infra::backend_api::{BackendApi, BackendRequest, TokenPlacement};
use crate::protocol::backend::{BackendCurrency, ListEnvelope};
use crate::protocol::views::CurrencyView;
use crate::services::response_cache::{cache_key, ResponseCache};

pub const CURRENCIES_KEY: &str = "currencies";
pub const CURRENCIES_TTL: Duration = Duration::from_secs(60 * 60);

pub const LOOKUP_KEY: &str = "lookup";
pub const LOOKUP_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Query parameters forwarded to `/lookup` and used for its cache key.
pub const LOOKUP_PARAMS: [&str; 2] = ["type", "lang"];

/// Currencies with flag URLs attached; cached for an hour.
pub async fn currencies(
    api: &BackendApi,
    cache: &ResponseCache,
    session: &SessionPayload,
    flag_cdn_url: &str,
) -> Result<Arc<Value>, AppError> {
    if let Some(hit) = cache.get(CURRENCIES_KEY) {
        debug!(key = CURRENCIES_KEY, "reference data cache hit");
        return Ok(hit);
    }

    let request = BackendRequest::get("/currencies")
        .authorized(&session.identity.backend_token, TokenPlacement::Query);
    let listed: ListEnvelope<BackendCurrency> = api.send_as(request).await?;
    let views: Vec<CurrencyView> = listed
        .into_items()
        .into_iter()
        .map(|currency| CurrencyView::from_backend(currency, flag_cdn_url))
        .collect();
    let value = serde_json::to_value(views)
        .map_err(|e| AppError::internal(format!("serializing currencies: {e}")))?;

    Ok(cache.set(CURRENCIES_KEY, value, CURRENCIES_TTL))
}

/// Drop cached currencies after a currency-rate write.
pub fn invalidate_currencies(cache: &ResponseCache) {
    cache.invalidate(CURRENCIES_KEY);
}

/// Longest accepted lookup parameter value.
const MAX_LOOKUP_VALUE_LEN: usize = 32;

fn is_lookup_code(value: &str) -> bool {
    (1..=MAX_LOOKUP_VALUE_LEN).contains(&value.len())
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// The allow-listed lookup parameters, trimmed, in [`LOOKUP_PARAMS`] order.
///
/// Each allowed name may appear at most once and must be a short code, so
/// the cache key always names exactly the query sent to the backend.
fn lookup_params(params: &[(String, String)]) -> Result<Vec<(&'static str, String)>, AppError> {
    let mut selected = Vec::with_capacity(LOOKUP_PARAMS.len());
    for name in LOOKUP_PARAMS {
        let mut values = params.iter().filter(|(n, _)| n == name).map(|(_, v)| v.trim());
        let Some(value) = values.next() else {
            continue;
        };
        if values.next().is_some() {
            return Err(AppError::invalid(
                ErrorCode::InvalidQuery,
                format!("Lookup parameter '{name}' may only be given once"),
            ));
        }
        if value.is_empty() {
            continue;
        }
        if !is_lookup_code(value) {
            return Err(AppError::invalid(
                ErrorCode::InvalidQuery,
                format!("Invalid lookup parameter '{name}'"),
            ));
        }
        selected.push((name, value.to_string()));
    }

    if !selected.iter().any(|(name, _)| *name == "type") {
        return Err(AppError::invalid(
            ErrorCode::InvalidQuery,
            "Lookup type is required",
        ));
    }
    Ok(selected)
}

/// A lookup table, cached per allow-listed parameter set for a day.
///
/// `type` is required. Parameters outside [`LOOKUP_PARAMS`] are not forwarded.
pub async fn lookup(
    api: &BackendApi,
    cache: &ResponseCache,
    session: &SessionPayload,
    params: &[(String, String)],
) -> Result<Arc<Value>, AppError> {
    let selected = lookup_params(params)?;
    let key = cache_key(
        LOOKUP_KEY,
        selected.iter().map(|(n, v)| (*n, v.as_str())),
        &LOOKUP_PARAMS,
    )
    .ok_or_else(|| AppError::internal("lookup parameters did not yield a cache key"))?;

    if let Some(hit) = cache.get(&key) {
        debug!(key = %key, "reference data cache hit");
        return Ok(hit);
    }

    let mut request = BackendRequest::get("/lookup");
    for (name, value) in &selected {
        request = request.query(*name, value.as_str());
    }
    let request = request.authorized(&session.identity.backend_token, TokenPlacement::Query);
    let value = api.send(request).await?;

    Ok(cache.set(key, value, LOOKUP_TTL))
}
