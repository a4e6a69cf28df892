//! Memoizing instance cache
//!
//! Stores resolved instances by cache key with single-flight resolution:
//!
//! - a cached success is returned without running the initializer;
//! - concurrent callers for the same key share exactly one initializer run
//!   and all observe its outcome;
//! - failed runs are never stored, so the next request re-attempts;
//! - growth is bounded by capacity (TinyLFU admission/eviction) and by
//!   per-entry time-to-live.

use crate::error::ResolveError;
use crate::instance::Instance;
use kiln_spec::CacheKey;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Memoizing store of resolved instances
///
/// The cache exclusively owns its instances; callers receive shared
/// read-only `Arc` views.
#[derive(Debug, Clone)]
pub struct InstanceCache {
    inner: Cache<CacheKey, Arc<dyn Instance>>,
}

impl InstanceCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with capacity bound and time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Resolve a key, memoizing on success
    ///
    /// If the key is cached the stored instance is returned and `init` is
    /// never polled. Otherwise exactly one of the concurrent callers for
    /// this key runs `init`; the rest wait and receive the same outcome. An
    /// `Err` outcome is delivered to every current waiter but not stored;
    /// the key is immediately eligible for a fresh attempt.
    ///
    /// # Errors
    /// Passes through `init`'s failure, shared among waiters.
    pub async fn resolve<F>(
        &self,
        key: CacheKey,
        init: F,
    ) -> Result<Arc<dyn Instance>, Arc<ResolveError>>
    where
        F: Future<Output = Result<Arc<dyn Instance>, ResolveError>>,
    {
        self.inner.try_get_with(key, init).await
    }

    /// Get instance from cache
    #[inline]
    #[must_use]
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<dyn Instance>> {
        self.inner.get(key).await
    }

    /// Insert instance into cache
    #[inline]
    pub async fn insert(&self, key: CacheKey, instance: Arc<dyn Instance>) {
        self.inner.insert(key, instance).await;
    }

    /// Invalidate cache entry
    #[inline]
    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Check if cache contains key
    #[inline]
    #[must_use]
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.inner.get(key).await.is_some()
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }

    /// Get approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Flush pending maintenance so eviction and counts are observable
    ///
    /// Test determinism helper; production callers never need it.
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for InstanceCache {
    /// Create cache with default capacity (10,000 entries)
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_spec::{Principal, SpecValue};
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Widget(u64);

    impl fmt::Display for Widget {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "widget #{}", self.0)
        }
    }

    fn key(tag: i64) -> CacheKey {
        CacheKey::derive(
            &Principal::new("urn:github:1"),
            &SpecValue::integer(tag),
        )
    }

    #[tokio::test]
    async fn cache_insert_and_get() {
        let cache = InstanceCache::new(100);
        let key = key(1);

        cache.insert(key, Arc::new(Widget(1))).await;

        let cached = cache.get(&key).await;
        assert_eq!(cached.unwrap().to_string(), "widget #1");
    }

    #[tokio::test]
    async fn cache_returns_none_for_missing() {
        let cache = InstanceCache::new(100);
        assert!(cache.get(&key(404)).await.is_none());
        assert!(!cache.contains(&key(404)).await);
    }

    #[tokio::test]
    async fn resolve_runs_init_once_per_key() {
        let cache = InstanceCache::new(100);
        let key = key(1);
        let runs = AtomicUsize::new(0);

        let first = cache
            .resolve(key, async {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(Widget(7)) as Arc<dyn Instance>)
            })
            .await
            .unwrap();
        assert_eq!(first.to_string(), "widget #7");
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        let second = cache
            .resolve(key, async {
                runs.fetch_add(1, Ordering::SeqCst);
                unreachable!("should use cached value")
            })
            .await
            .unwrap();
        assert_eq!(second.to_string(), "widget #7");
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_resolve_is_not_cached() {
        let cache = InstanceCache::new(100);
        let key = key(1);

        let err = cache
            .resolve(key, async { Err(ResolveError::Fault("boom".to_string())) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!cache.contains(&key).await);

        // Next attempt runs a fresh initializer and may succeed.
        let recovered = cache
            .resolve(key, async { Ok(Arc::new(Widget(2)) as Arc<dyn Instance>) })
            .await
            .unwrap();
        assert_eq!(recovered.to_string(), "widget #2");
        assert!(cache.contains(&key).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_resolves_share_one_init() {
        let cache = Arc::new(InstanceCache::new(100));
        let key = key(1);
        let runs = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let runs = Arc::clone(&runs);
            tasks.push(tokio::spawn(async move {
                cache
                    .resolve(key, async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(Arc::new(Widget(9)) as Arc<dyn Instance>)
                    })
                    .await
            }));
        }

        for task in tasks {
            let instance = task.await.unwrap().unwrap();
            assert_eq!(instance.to_string(), "widget #9");
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn capacity_bound_is_enforced() {
        let cache = InstanceCache::new(4);

        for tag in 0..64 {
            cache.insert(key(tag), Arc::new(Widget(1))).await;
        }
        cache.run_pending_tasks().await;

        assert!(cache.entry_count() <= 4);
        assert!(cache.stats().entry_count <= 4);
    }

    #[tokio::test]
    async fn ttl_expires_entries() {
        let cache = InstanceCache::with_ttl(100, Duration::from_millis(50));
        let key = key(1);

        cache.insert(key, Arc::new(Widget(1))).await;
        assert!(cache.contains(&key).await);

        tokio::time::sleep(Duration::from_millis(120)).await;
        cache.run_pending_tasks().await;
        assert!(!cache.contains(&key).await);
    }

    #[tokio::test]
    async fn cache_invalidation() {
        let cache = InstanceCache::new(100);
        let key = key(1);

        cache.insert(key, Arc::new(Widget(1))).await;
        assert!(cache.contains(&key).await);

        cache.invalidate(&key).await;
        assert!(!cache.contains(&key).await);

        cache.insert(key, Arc::new(Widget(1))).await;
        cache.invalidate_all();
        cache.run_pending_tasks().await;
        assert!(!cache.contains(&key).await);
    }
}
