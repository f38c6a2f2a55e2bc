//! Time-to-live cache for fetched series.

use async_trait::async_trait;
use regime_core::error::DataError;
use regime_core::traits::{FetchRequest, MarketDataProvider};
use regime_core::types::{Lookback, PriceSeries, Timeframe};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Cache key: one entry per (symbol, lookback, interval).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub lookback: Lookback,
    pub interval: Timeframe,
}

impl From<&FetchRequest> for CacheKey {
    fn from(request: &FetchRequest) -> Self {
        Self {
            symbol: request.symbol.clone(),
            lookback: request.lookback,
            interval: request.interval,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    series: PriceSeries,
    expires_at: Instant,
}

/// In-memory series cache with a fixed time-to-live.
///
/// Callers pass the current instant so expiry can be checked without a
/// global clock.
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl TtlCache {
    /// Create a new cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Time-to-live of new entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a series that has not expired at `now`.
    pub fn get(&self, key: &CacheKey, now: Instant) -> Option<&PriceSeries> {
        self.entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| &entry.series)
    }

    /// Store a series fetched at `now`.
    pub fn put(&mut self, key: CacheKey, series: PriceSeries, now: Instant) {
        let expires_at = now + self.ttl;
        self.entries.insert(key, CacheEntry { series, expires_at });
    }

    /// Drop every entry that has expired at `now`.
    pub fn evict_expired(&mut self, now: Instant) {
        self.entries.retain(|_, entry| now < entry.expires_at);
    }

    /// Clear all cached data.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Provider wrapper that serves repeated requests from a `TtlCache`.
///
/// Failed fetches are not cached.
pub struct CachedProvider<P> {
    inner: P,
    cache: Mutex<TtlCache>,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    /// Wrap `inner` with a cache of the given time-to-live.
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self::with_cache(inner, TtlCache::new(ttl))
    }

    /// Wrap `inner` with an existing cache.
    pub fn with_cache(inner: P, cache: TtlCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
        }
    }

    /// Forget every cached series.
    pub async fn invalidate(&self) {
        self.cache.lock().await.clear();
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    async fn fetch(&self, request: &FetchRequest) -> Result<PriceSeries, DataError> {
        let key = CacheKey::from(request);
        {
            let mut cache = self.cache.lock().await;
            let now = Instant::now();
            cache.evict_expired(now);
            if let Some(series) = cache.get(&key, now) {
                debug!(request = %request, "Cache hit");
                return Ok(series.clone());
            }
        }

        debug!(request = %request, provider = self.inner.name(), "Cache miss");
        let series = self.inner.fetch(request).await?;
        self.cache
            .lock()
            .await
            .put(key, series.clone(), Instant::now());
        Ok(series)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
