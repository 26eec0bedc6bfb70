//! In-memory LRU image cache bounded by a byte budget.

use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::{CacheEntry, CacheKey};
use crate::domain::ports::ImageCachePort;

/// Default memory budget in bytes (50 MB).
pub const DEFAULT_MEMORY_BUDGET: usize = 50 * 1024 * 1024;

struct Inner {
    entries: LruCache<CacheKey, CacheEntry>,
    total_bytes: usize,
}

/// In-memory LRU cache for raw image bytes.
///
/// Inserting evicts least recently used entries until the new entry fits the
/// budget. An entry larger than the whole budget is still stored, alone.
pub struct MemoryImageCache {
    inner: RwLock<Inner>,
    budget: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the given byte budget.
    #[must_use]
    pub fn new(budget: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: LruCache::unbounded(),
                total_bytes: 0,
            }),
            budget,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the summed size of all cached entries.
    pub async fn total_bytes(&self) -> usize {
        self.inner.read().await.total_bytes
    }

    /// Returns cache statistics.
    #[allow(clippy::cast_precision_loss)]
    pub async fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let inner = self.inner.read().await;
        CacheStats {
            hits,
            misses,
            hit_rate,
            entries: inner.entries.len(),
            bytes: inner.total_bytes,
            budget: self.budget,
        }
    }

    /// Peeks at an entry without promoting it in the LRU.
    pub async fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        let inner = self.inner.read().await;
        inner.entries.peek(key).cloned()
    }

    /// Checks if an entry is cached without touching recency.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        self.inner.read().await.entries.contains(key)
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached entries.
    pub entries: usize,
    /// Current summed entry size in bytes.
    pub bytes: usize,
    /// Configured byte budget.
    pub budget: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images ({} of {} bytes), {:.1}% hit rate ({} hits, {} misses)",
            self.entries, self.bytes, self.budget, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait::async_trait]
impl ImageCachePort for MemoryImageCache {
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut inner = self.inner.write().await;
        if let Some(entry) = inner.entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
            Some(entry.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    async fn put(&self, entry: CacheEntry) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let size = entry.size();

        if let Some(previous) = inner.entries.pop(&entry.key) {
            inner.total_bytes -= previous.size();
        }

        while inner.total_bytes + size > self.budget {
            let Some((evicted_key, evicted)) = inner.entries.pop_lru() else {
                break;
            };
            inner.total_bytes -= evicted.size();
            debug!(key = %evicted_key, size = evicted.size(), "Evicted image from memory cache");
        }

        if size > self.budget {
            debug!(key = %entry.key, size, budget = self.budget, "Entry exceeds memory budget, storing alone");
        }

        debug!(key = %entry.key, size, "Storing image in memory cache");
        inner.total_bytes += size;
        inner.entries.put(entry.key.clone(), entry);
    }

    fn len(&self) -> usize {
        // Best-effort; reports zero while a writer holds the lock.
        let inner = self.inner.try_read();
        inner.map(|i| i.entries.len()).unwrap_or(0)
    }

    async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.total_bytes = 0;
        debug!("Cleared memory image cache");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn entry(key: &str, size: usize) -> CacheEntry {
        CacheEntry::new(CacheKey::new(key), vec![7u8; size])
    }

    #[tokio::test]
    async fn test_cache_put_and_get() {
        let cache = MemoryImageCache::new(1024);
        cache.put(entry("test1", 100)).await;

        let retrieved = cache.get(&CacheKey::new("test1")).await;

        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().size(), 100);
        assert_eq!(cache.total_bytes().await, 100);
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = MemoryImageCache::new(1024);
        assert!(cache.get(&CacheKey::new("nonexistent")).await.is_none());
    }

    #[tokio::test]
    async fn test_eviction_by_bytes() {
        let cache = MemoryImageCache::new(250);

        cache.put(entry("test1", 100)).await;
        cache.put(entry("test2", 100)).await;
        cache.put(entry("test3", 100)).await;

        // test1 should be evicted (LRU)
        assert!(cache.get(&CacheKey::new("test1")).await.is_none());
        assert!(cache.get(&CacheKey::new("test2")).await.is_some());
        assert!(cache.get(&CacheKey::new("test3")).await.is_some());
        assert_eq!(cache.total_bytes().await, 200);
    }

    #[tokio::test]
    async fn test_get_promotes_entry() {
        let cache = MemoryImageCache::new(250);

        cache.put(entry("test1", 100)).await;
        cache.put(entry("test2", 100)).await;
        let _ = cache.get(&CacheKey::new("test1")).await;
        cache.put(entry("test3", 100)).await;

        assert!(cache.contains(&CacheKey::new("test1")).await);
        assert!(!cache.contains(&CacheKey::new("test2")).await);
    }

    #[tokio::test]
    async fn test_large_insert_evicts_several() {
        let cache = MemoryImageCache::new(300);

        cache.put(entry("a", 100)).await;
        cache.put(entry("b", 100)).await;
        cache.put(entry("c", 100)).await;
        cache.put(entry("big", 250)).await;

        assert!(!cache.contains(&CacheKey::new("a")).await);
        assert!(!cache.contains(&CacheKey::new("b")).await);
        assert!(!cache.contains(&CacheKey::new("c")).await);
        assert!(cache.contains(&CacheKey::new("big")).await);
        assert_eq!(cache.total_bytes().await, 250);
    }

    #[tokio::test]
    async fn test_replacing_key_adjusts_size() {
        let cache = MemoryImageCache::new(1024);

        cache.put(entry("test1", 100)).await;
        cache.put(entry("test1", 40)).await;

        assert_eq!(cache.total_bytes().await, 40);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_entry_is_stored_alone() {
        let cache = MemoryImageCache::new(100);

        cache.put(entry("small", 50)).await;
        cache.put(entry("huge", 500)).await;

        assert!(!cache.contains(&CacheKey::new("small")).await);
        assert!(cache.contains(&CacheKey::new("huge")).await);
        assert_eq!(cache.len(), 1);

        cache.put(entry("next", 10)).await;
        assert!(!cache.contains(&CacheKey::new("huge")).await);
        assert_eq!(cache.total_bytes().await, 10);
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let cache = MemoryImageCache::new(1024);
        cache.put(entry("test1", 10)).await;

        // Hit
        let _ = cache.get(&CacheKey::new("test1")).await;
        // Miss
        let _ = cache.get(&CacheKey::new("missing")).await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.bytes, 10);
        assert!((stats.hit_rate - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_peek_does_not_promote() {
        let cache = MemoryImageCache::new(200);

        cache.put(entry("test1", 100)).await;
        cache.put(entry("test2", 100)).await;

        // Peek at test1 (should not promote it)
        let _ = cache.peek(&CacheKey::new("test1")).await;

        // Add test3, should evict test1 (since peek doesn't promote)
        cache.put(entry("test3", 100)).await;

        assert!(cache.peek(&CacheKey::new("test1")).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_resets_size() {
        let cache = MemoryImageCache::new(1024);
        cache.put(entry("test1", 10)).await;
        cache.put(entry("test2", 20)).await;

        cache.clear().await;

        assert!(cache.is_empty());
        assert_eq!(cache.total_bytes().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_stay_within_budget() {
        let cache = Arc::new(MemoryImageCache::new(1000));

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache.put(entry(&format!("key{}", i % 16), 60 + i)).await;
                    let _ = cache.get(&CacheKey::new(format!("key{}", (i + 3) % 16))).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let stats = cache.stats().await;
        assert!(stats.bytes <= 1000);

        let mut summed = 0;
        for i in 0..16 {
            if let Some(e) = cache.peek(&CacheKey::new(format!("key{i}"))).await {
                summed += e.size();
            }
        }
        assert_eq!(summed, stats.bytes);
    }
}
