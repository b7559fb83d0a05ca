//! In-memory caching for provider responses.
//!
//! Entries are keyed by the identity of the provider request (requested
//! currency set and date range), so two queries that differ only in which
//! of the requested currencies is the base share one entry.
//!
//! The cache lives in memory, so hits come from a long-lived caller reusing
//! one [`CachedSource`] across queries. A single `fx-timeframe fetch` run
//! makes one request and never hits; there the wrapper only applies the
//! configured TTL.

use super::RateSource;
use crate::data::fx::{FxQuery, RawPayload};
use crate::error::Result;
use hashbrown::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Default time-to-live: one day, to respect limited provider quotas
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: RawPayload,
    expires_at: Instant,
}

/// Thread-safe TTL cache of raw payloads
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Cache key for the provider request a query produces
    pub fn key(query: &FxQuery) -> String {
        let currencies = query
            .requested_currencies()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}|{}|{}", currencies, query.start, query.end)
    }

    pub fn get(&self, key: &str) -> Option<RawPayload> {
        let entries = self.lock();
        entries
            .get(key)
            .filter(|entry| Instant::now() <= entry.expires_at)
            .map(|entry| entry.payload.clone())
    }

    pub fn put(&self, key: String, payload: RawPayload) {
        if self.ttl.is_zero() {
            return;
        }
        let expires_at = Instant::now() + self.ttl;
        self.lock().insert(key, CacheEntry { payload, expires_at });
    }

    /// Drop expired entries
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.lock().retain(|_, entry| entry.expires_at > now);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

/// A [`RateSource`] that consults a [`ResponseCache`] before fetching
pub struct CachedSource<S> {
    inner: S,
    cache: ResponseCache,
}

impl<S: RateSource> CachedSource<S> {
    pub fn new(inner: S, cache: ResponseCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RateSource> RateSource for CachedSource<S> {
    async fn fetch_timeframe(&self, query: &FxQuery) -> Result<RawPayload> {
        let key = ResponseCache::key(query);
        if let Some(payload) = self.cache.get(&key) {
            log::debug!("Cache hit for {}", key);
            return Ok(payload);
        }

        let payload = self.inner.fetch_timeframe(query).await?;
        self.cache.put(key, payload.clone());
        Ok(payload)
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
