//! Query result cache.
//!
//! The pipeline only calls `try_get` and `set`; eviction is entirely the
//! provider's business.

use crate::query::CachePolicy;
use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::{
    any::Any,
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::trace;

/// Type-erased cached result.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

///
/// QueryCache
///

#[async_trait]
pub trait QueryCache: Send + Sync {
    async fn try_get(&self, policy: &CachePolicy) -> Option<CachedValue>;

    async fn set(&self, policy: &CachePolicy, value: CachedValue);
}

///
/// NoopCache
/// Always misses and discards writes.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCache;

#[async_trait]
impl QueryCache for NoopCache {
    async fn try_get(&self, _policy: &CachePolicy) -> Option<CachedValue> {
        None
    }

    async fn set(&self, _policy: &CachePolicy, _value: CachedValue) {}
}

///
/// MemoryCache
///
/// In-process cache backed by `moka`; each entry expires after the lifetime
/// its query declared.
///

#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, MemoryEntry>,
}

#[derive(Clone)]
struct MemoryEntry {
    value: CachedValue,
    lifetime: Duration,
}

struct PolicyExpiry;

impl Expiry<String, MemoryEntry> for PolicyExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &MemoryEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.lifetime)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &MemoryEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.lifetime)
    }
}

impl MemoryCache {
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PolicyExpiry)
            .build();

        Self { entries }
    }

    /// Approximate number of live entries.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

#[async_trait]
impl QueryCache for MemoryCache {
    async fn try_get(&self, policy: &CachePolicy) -> Option<CachedValue> {
        let hit = self.entries.get(policy.key()).await.map(|entry| entry.value);
        trace!(key = policy.key(), hit = hit.is_some(), "memory cache lookup");

        hit
    }

    async fn set(&self, policy: &CachePolicy, value: CachedValue) {
        let entry = MemoryEntry {
            value,
            lifetime: policy.lifetime(),
        };

        self.entries.insert(policy.key().to_string(), entry).await;
    }
}
