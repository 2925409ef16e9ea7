//! Process-lifetime cache for reference-data responses.
//!
//! Owned by `AppState` and shared by reference. Expiry is checked on read
//! only; expired entries are swept when a new key would push the cache past
//! its entry bound, and the entry closest to expiry is evicted if the cache
//! is still full. Concurrent `set`s on one key are last-write-wins and
//! concurrent misses each go to the backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

/// Longest query value that may become part of a cache key.
const MAX_KEY_VALUE_LEN: usize = 32;
/// Entry bound for [`ResponseCache::new`].
pub const DEFAULT_MAX_ENTRIES: usize = 512;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Arc<Value>,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache that never holds more than `max_entries` keys (at least one).
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Live value for `key`, or `None` if missing or expired.
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &str, now: Instant) -> Option<Arc<Value>> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Store `value` for `ttl`, replacing any previous entry wholesale.
    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Duration) -> Arc<Value> {
        self.set_at(key, value, ttl, Instant::now())
    }

    pub fn set_at(&self, key: impl Into<String>, value: Value, ttl: Duration, now: Instant) -> Arc<Value> {
        let value = Arc::new(value);
        let entry = CacheEntry {
            value: Arc::clone(&value),
            expires_at: now + ttl,
        };
        let key = key.into();
        let mut entries = self.entries.lock();
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| now < entry.expires_at);
            if entries.len() >= self.max_entries {
                let soonest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(key, _)| key.clone());
                if let Some(evicted) = soonest {
                    debug!(key = %evicted, "response cache full; evicting entry");
                    entries.remove(&evicted);
                }
            }
        }
        entries.insert(key, entry);
        value
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.entries.lock().retain(|key, _| !key.starts_with(prefix));
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a cache key from an endpoint and its query parameters.
///
/// Only parameters named in `allowed` contribute and pairs are sorted, so
/// parameter order does not matter. Returns `None` (do not cache) when an
/// allowed value is longer than a short code or an allowed name repeats,
/// since the key would no longer describe a single backend query.
pub fn cache_key<'a, I>(endpoint: &str, params: I, allowed: &[&str]) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = params
        .into_iter()
        .filter(|(name, value)| allowed.contains(name) && !value.is_empty())
        .collect();
    if pairs.iter().any(|(_, value)| value.len() > MAX_KEY_VALUE_LEN) {
        return None;
    }
    pairs.sort_unstable();
    if pairs.windows(2).any(|w| w[0].0 == w[1].0) {
        return None;
    }

    if pairs.is_empty() {
        return Some(endpoint.to_string());
    }
    let query = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    Some(format!("{endpoint}?{query}"))
}
