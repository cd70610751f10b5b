//! Short-lived cache of candidate reachability verdicts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;

use crate::observability::metrics;

/// Default verdict lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// Cache key. Scoped by resource so two resources sharing a mirror URL never
/// see each other's verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    resource: String,
    url: String,
}

impl CacheKey {
    fn new(resource: &str, url: &str) -> Self {
        Self {
            resource: resource.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct HealthCacheEntry {
    healthy: bool,
    checked_at: Instant,
    generation: u64,
}

impl HealthCacheEntry {
    fn is_live(&self, ttl: Duration, now: Instant, generation: u64) -> bool {
        self.generation == generation && now.saturating_duration_since(self.checked_at) <= ttl
    }
}

/// A fresh cache entry as reported to operators.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub resource: String,
    pub url: String,
    pub healthy: bool,
    pub age_ms: u64,
}

/// A thread-safe TTL cache for health verdicts.
///
/// Every `clear()` starts a new generation. Verdicts written on behalf of an
/// older generation are dropped, so a probe that was already in flight when
/// the cache was cleared cannot repopulate it.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct HealthCache {
    inner: Arc<DashMap<CacheKey, HealthCacheEntry>>,
    generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl HealthCache {
    /// Create an empty cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current generation. Read it before probing and hand it back to
    /// [`HealthCache::record`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Cached verdict, or `None` on a miss or a stale entry.
    pub fn get(&self, resource: &str, url: &str) -> Option<bool> {
        let now = Instant::now();
        let generation = self.generation();
        self.inner
            .get(&CacheKey::new(resource, url))
            .filter(|entry| entry.is_live(self.ttl, now, generation))
            .map(|entry| entry.healthy)
    }

    /// Record a verdict for the current generation.
    pub fn set(&self, resource: &str, url: &str, healthy: bool) {
        self.record(resource, url, healthy, self.generation());
    }

    /// Record a verdict observed by a probe that started in `generation`.
    /// Returns `false` when the cache was cleared since and the verdict was
    /// dropped.
    pub fn record(&self, resource: &str, url: &str, healthy: bool, generation: u64) -> bool {
        if generation != self.generation() {
            tracing::debug!(resource = %resource, url = %url, "Dropping verdict from before cache clear");
            return false;
        }

        self.inner.insert(
            CacheKey::new(resource, url),
            HealthCacheEntry {
                healthy,
                checked_at: Instant::now(),
                generation,
            },
        );
        tracing::debug!(resource = %resource, url = %url, healthy, "Health verdict cached");
        metrics::record_cache_size(self.inner.len());
        true
    }

    /// Drop every entry for every resource.
    pub fn clear(&self) {
        // Bump first: an insert racing with the clear below carries the old
        // generation and is never served.
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.clear();
        metrics::record_cache_size(0);
    }

    /// Number of stored entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Fresh entries, sorted by resource then URL.
    pub fn snapshot(&self) -> Vec<HealthSnapshot> {
        let now = Instant::now();
        let generation = self.generation();
        let mut entries: Vec<HealthSnapshot> = self
            .inner
            .iter()
            .filter(|r| r.value().is_live(self.ttl, now, generation))
            .map(|r| HealthSnapshot {
                resource: r.key().resource.clone(),
                url: r.key().url.clone(),
                healthy: r.value().healthy,
                age_ms: now.saturating_duration_since(r.value().checked_at).as_millis() as u64,
            })
            .collect();
        entries.sort_by(|a, b| (&a.resource, &a.url).cmp(&(&b.resource, &b.url)));
        entries
    }
}

impl Default for HealthCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
