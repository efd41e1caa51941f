//! Caching layer for market data to reduce Yahoo calls
//!
//! Repeated analyses of the same ticker within a session reuse the history
//! and snapshot fetched the first time, until the tier's TTL expires.

use crate::config::ResearchConfig;
use crate::error::Result;
use crate::market::{Bar, CompanySnapshot, HistoryRange, MarketDataSource};
use crate::ticker::Ticker;
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Thread-safe cache with a fixed time-to-live per entry
pub struct TtlCache<K, V> {
    cache: Arc<RwLock<TimedCache<K, V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: K, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetcher: F) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);
        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &K) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// A market data source with a history tier and a fundamentals tier
pub struct CachedMarketData<S> {
    inner: S,
    history: TtlCache<(Ticker, HistoryRange), Vec<Bar>>,
    snapshots: TtlCache<Ticker, CompanySnapshot>,
}

impl<S: MarketDataSource> CachedMarketData<S> {
    /// Wrap a source with explicit TTLs
    pub fn new(inner: S, history_ttl: Duration, snapshot_ttl: Duration) -> Self {
        Self {
            inner,
            history: TtlCache::new(history_ttl),
            snapshots: TtlCache::new(snapshot_ttl),
        }
    }

    /// Wrap a source with the TTLs from the configuration
    pub fn from_config(inner: S, config: &ResearchConfig) -> Self {
        Self::new(inner, config.cache_ttl_history, config.cache_ttl_fundamentals)
    }

    /// Drop every cached entry
    pub async fn clear_all(&self) {
        self.history.clear().await;
        self.snapshots.clear().await;
    }
}

#[async_trait]
impl<S: MarketDataSource> MarketDataSource for CachedMarketData<S> {
    async fn history(&self, ticker: &Ticker, range: HistoryRange) -> Result<Vec<Bar>> {
        self.history
            .get_or_fetch((ticker.clone(), range), || self.inner.history(ticker, range))
            .await
    }

    async fn snapshot(&self, ticker: &Ticker) -> Result<CompanySnapshot> {
        self.snapshots
            .get_or_fetch(ticker.clone(), || self.inner.snapshot(ticker))
            .await
    }
}
