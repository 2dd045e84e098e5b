//! # Query Cache
//!
//! Time-bounded memoization of content-store query results, shared by every
//! resolver in the process.
//!
//! ## Semantics
//!
//! - An entry is fresh iff `now - stored_at < ttl`. Freshness is only checked
//!   on read; a stale entry lingers until it is overwritten, pushed out by
//!   overflow, or swept by [`QueryCache::evict_expired`].
//! - Eviction is **FIFO with a cap**, not LRU. When an insert takes the map
//!   past `max_entries`, the earliest-inserted entry still present is dropped.
//!   Reads do not refresh an entry's position, and overwriting an existing
//!   key keeps its original slot in the queue.
//! - Keys are order-insensitive in their parameters (see [`CacheKey`]).
//!
//! The cache is an explicit object built once at startup with an injected
//! [`Clock`] and size limit, then shared through an `Arc`.

mod clock;
mod key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{CacheKey, QueryParams, params};

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::CacheConfig;

/// One memoized result.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

struct CacheState<T> {
    entries: HashMap<CacheKey, CacheEntry<T>>,
    /// Insertion order, oldest first. Always holds exactly the keys of `entries`.
    order: VecDeque<CacheKey>,
}

/// Counters exposed for logging and the status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub ttl_ms: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Process-wide FIFO query cache.
pub struct QueryCache<T> {
    state: RwLock<CacheState<T>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<T: Clone> QueryCache<T> {
    /// Create a cache with the given clock, default TTL and entry cap.
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration, max_entries: usize) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            clock,
            ttl,
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Create a wall-clock cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Arc::new(SystemClock), config.ttl, config.max_entries)
    }

    /// Default TTL used by [`get`](Self::get) and [`evict_expired`](Self::evict_expired).
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Look up a fresh value using the default TTL.
    pub async fn get(&self, key: &CacheKey) -> Option<T> {
        self.get_with_ttl(key, self.ttl).await
    }

    /// Look up a value that is younger than `ttl`.
    pub async fn get_with_ttl(&self, key: &CacheKey, ttl: Duration) -> Option<T> {
        let now = self.clock.now();
        let state = self.state.read().await;
        match state.entries.get(key) {
            Some(entry) if now.saturating_duration_since(entry.stored_at) < ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(key = %key, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(key = %key, "cache stale");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(key = %key, "cache miss");
                None
            }
        }
    }

    /// Store a value, stamping it with the current time.
    ///
    /// Returns the key evicted to make room, if any.
    pub async fn put(&self, key: CacheKey, value: T) -> Option<CacheKey> {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        let mut state = self.state.write().await;

        if let Some(existing) = state.entries.get_mut(&key) {
            *existing = entry;
            return None;
        }

        state.order.push_back(key.clone());
        state.entries.insert(key, entry);

        if state.entries.len() > self.max_entries
            && let Some(oldest) = state.order.pop_front()
        {
            state.entries.remove(&oldest);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %oldest, "evicted oldest cache entry");
            return Some(oldest);
        }
        None
    }

    /// Return the cached value, or run `fetch` and cache its success.
    ///
    /// Errors are passed through and never cached. Two concurrent misses
    /// on the same key both fetch; the later `put` wins.
    pub async fn get_or_fetch<E, F, Fut>(&self, key: CacheKey, ttl: Duration, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get_with_ttl(&key, ttl).await {
            return Ok(value);
        }
        let value = fetch().await?;
        self.put(key, value.clone()).await;
        Ok(value)
    }

    /// Drop every entry older than the default TTL. Returns how many went.
    pub async fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
        let CacheState { entries, order } = &mut *state;
        order.retain(|key| entries.contains_key(key));
        before - state.entries.len()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether `key` is present, fresh or not.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.state.read().await.entries.contains_key(key)
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.order.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len().await,
            max_entries: self.max_entries,
            ttl_ms: self.ttl.as_millis() as u64,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
