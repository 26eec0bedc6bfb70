//! Image acquisition coordinator.
//!
//! Implements a three-tier cache: Memory -> Disk -> Network

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Url;
use tokio::sync::{Mutex as AsyncMutex, Semaphore, mpsc};
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{AcquiredImage, CacheKey, ImageSource};
use crate::domain::errors::{AcquireError, CacheResult};
use crate::domain::ports::{ImageCachePort, ImageFetcherPort};

use super::disk_cache::{DEFAULT_MAX_CACHE_SIZE, DiskImageCache, default_cache_dir};
use super::fetcher::{DEFAULT_FETCH_TIMEOUT, HttpImageFetcher};
use super::memory_cache::{CacheStats, DEFAULT_MEMORY_BUDGET, MemoryImageCache};

/// Message sent when a prefetched image finishes loading.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// The requested URL.
    pub url: String,
    /// The acquired image, or the reason there is none.
    pub result: Result<AcquiredImage, AcquireError>,
}

/// Configuration for the cache service.
#[derive(Debug, Clone)]
pub struct CacheServiceConfig {
    /// Memory tier budget in bytes.
    pub memory_budget_bytes: usize,
    /// Advisory disk tier budget in bytes.
    pub disk_budget_bytes: u64,
    /// Disk tier directory; the platform cache directory when unset.
    pub cache_dir: Option<PathBuf>,
    /// Whether to use a disk tier at all.
    pub disk_enabled: bool,
    /// Coalesce concurrent acquisitions of the same key.
    pub single_flight: bool,
    /// Network request timeout.
    pub fetch_timeout: Duration,
    /// Maximum concurrent prefetch downloads.
    pub max_concurrent_downloads: usize,
}

impl Default for CacheServiceConfig {
    fn default() -> Self {
        Self {
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET,
            disk_budget_bytes: DEFAULT_MAX_CACHE_SIZE,
            cache_dir: None,
            disk_enabled: true,
            single_flight: true,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_concurrent_downloads: 4,
        }
    }
}

type InFlight = parking_lot::Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>;

/// Orchestrates image acquisition from memory, disk, and network.
///
/// Cheap to clone; clones share the same tiers.
#[derive(Clone)]
pub struct CacheService {
    memory: Arc<MemoryImageCache>,
    disk: Option<Arc<DiskImageCache>>,
    fetcher: Arc<dyn ImageFetcherPort>,
    in_flight: Arc<InFlight>,
    single_flight: bool,
    prefetch_permits: Arc<Semaphore>,
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("disk_tier", &self.disk.is_some())
            .field("single_flight", &self.single_flight)
            .finish_non_exhaustive()
    }
}

/// Holds a key's slot in the in-flight table; frees it when the last holder leaves.
struct FlightSlot<'a> {
    table: &'a InFlight,
    key: CacheKey,
    lock: Arc<AsyncMutex<()>>,
}

impl<'a> FlightSlot<'a> {
    fn join(table: &'a InFlight, key: &CacheKey) -> Self {
        let lock = table
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        Self {
            table,
            key: key.clone(),
            lock,
        }
    }
}

impl Drop for FlightSlot<'_> {
    fn drop(&mut self) {
        let mut table = self.table.lock();
        // One reference in the table, one here.
        if Arc::strong_count(&self.lock) <= 2 {
            table.remove(&self.key);
        }
    }
}

impl CacheService {
    /// Creates a service from already constructed tiers.
    ///
    /// Passing `None` for `disk` yields the two-tier (memory + network) variant.
    #[must_use]
    pub fn new(
        memory: Arc<MemoryImageCache>,
        disk: Option<Arc<DiskImageCache>>,
        fetcher: Arc<dyn ImageFetcherPort>,
        config: &CacheServiceConfig,
    ) -> Self {
        Self {
            memory,
            disk,
            fetcher,
            in_flight: Arc::new(parking_lot::Mutex::new(HashMap::new())),
            single_flight: config.single_flight,
            prefetch_permits: Arc::new(Semaphore::new(config.max_concurrent_downloads.max(1))),
        }
    }

    /// Builds all tiers from configuration.
    ///
    /// A disk directory that cannot be prepared disables the disk tier rather
    /// than failing.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub async fn from_config(config: &CacheServiceConfig) -> CacheResult<Self> {
        let memory = Arc::new(MemoryImageCache::new(config.memory_budget_bytes));

        let disk = if config.disk_enabled {
            let dir = config.cache_dir.clone().unwrap_or_else(default_cache_dir);
            match DiskImageCache::new(dir, config.disk_budget_bytes).await {
                Ok(cache) => Some(Arc::new(cache)),
                Err(e) => {
                    warn!(error = %e, "Disk cache unavailable, using memory cache only");
                    None
                }
            }
        } else {
            debug!("Disk cache disabled by configuration");
            None
        };

        let fetcher = Arc::new(HttpImageFetcher::new(config.fetch_timeout)?);

        Ok(Self::new(memory, disk, fetcher, config))
    }

    /// Returns true if a disk tier is configured.
    #[must_use]
    pub const fn has_disk_tier(&self) -> bool {
        self.disk.is_some()
    }

    #[cfg(test)]
    fn disk_cache(&self) -> Option<&DiskImageCache> {
        self.disk.as_deref()
    }

    /// Acquires the image at `url`, checking memory, then disk, then network.
    ///
    /// Disk hits are promoted into memory; network hits are written to both
    /// tiers. Failing to write the disk tier is logged and otherwise ignored.
    ///
    /// # Errors
    /// Returns error if the URL is invalid or the image cannot be fetched.
    pub async fn acquire(&self, url: &str) -> Result<AcquiredImage, AcquireError> {
        let url = parse_resource_url(url)?;
        let key = CacheKey::from_url(url.as_str());

        if let Some(entry) = self.memory.get(&key).await {
            return Ok(AcquiredImage::new(entry, ImageSource::MemoryCache));
        }

        let slot = self
            .single_flight
            .then(|| FlightSlot::join(&self.in_flight, &key));
        let _turn = match &slot {
            Some(slot) => Some(slot.lock.clone().lock_owned().await),
            None => None,
        };

        if slot.is_some()
            && let Some(entry) = self.memory.peek(&key).await
        {
            trace!(key = %key, "Served by a concurrent acquisition");
            return Ok(AcquiredImage::new(entry, ImageSource::MemoryCache));
        }

        self.load_below_memory(&key, &url).await
    }

    /// Acquires only the image bytes.
    ///
    /// # Errors
    /// Returns error if the URL is invalid or the image cannot be fetched.
    pub async fn acquire_bytes(&self, url: &str) -> Result<Bytes, AcquireError> {
        self.acquire(url).await.map(AcquiredImage::into_bytes)
    }

    async fn load_below_memory(
        &self,
        key: &CacheKey,
        url: &Url,
    ) -> Result<AcquiredImage, AcquireError> {
        if let Some(disk) = &self.disk
            && let Some(entry) = disk.get(key).await
        {
            self.memory.put(entry.clone()).await;
            debug!(key = %key, "Promoted disk entry into memory cache");
            return Ok(AcquiredImage::new(entry, ImageSource::DiskCache));
        }

        debug!(key = %key, url = %url, "Downloading image from network");

        let entry = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(|e| {
                warn!(key = %key, url = %url, error = %e, "Image fetch failed");
                AcquireError::from(e)
            })?
            .with_key(key.clone());

        self.memory.put(entry.clone()).await;

        if let Some(disk) = &self.disk
            && let Err(e) = disk.put(&entry).await
        {
            warn!(key = %key, error = %e, "Failed to cache to disk");
        }

        debug!(key = %key, source = "network", "Image loaded successfully");

        Ok(AcquiredImage::new(entry, ImageSource::Network))
    }

    /// Starts acquiring images in the background.
    /// Each result is sent via the event channel.
    pub fn prefetch(&self, urls: Vec<String>, events: &mpsc::UnboundedSender<ImageLoadedEvent>) {
        for url in urls {
            let service = self.clone();
            let events = events.clone();
            tokio::spawn(async move {
                let Ok(_permit) = service.prefetch_permits.clone().acquire_owned().await else {
                    return;
                };
                let result = service.acquire(&url).await;
                let _ = events.send(ImageLoadedEvent { url, result });
            });
        }
    }

    /// Returns memory cache statistics.
    pub async fn memory_stats(&self) -> CacheStats {
        self.memory.stats().await
    }

    /// Clears the memory tier only.
    pub async fn clear_memory(&self) {
        self.memory.clear().await;
    }

    /// Clears all caches.
    pub async fn clear_all(&self) {
        self.memory.clear().await;
        if let Some(disk) = &self.disk
            && let Err(e) = disk.clear().await
        {
            warn!(error = %e, "Failed to clear disk cache");
        }
        info!("Cleared all image caches");
    }
}

/// Accepts absolute `http`/`https` URLs with a host.
fn parse_resource_url(raw: &str) -> Result<Url, AcquireError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AcquireError::invalid_resource(raw, "empty URL"));
    }

    let url =
        Url::parse(trimmed).map_err(|e| AcquireError::invalid_resource(raw, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AcquireError::invalid_resource(
            raw,
            format!("unsupported scheme {:?}", url.scheme()),
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(AcquireError::invalid_resource(raw, "missing host"));
    }

    Ok(url)
}
