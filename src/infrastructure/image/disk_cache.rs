//! Disk-based image cache for persistence across sessions.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::domain::entities::{CacheEntry, CacheKey};
use crate::domain::errors::{CacheError, CacheResult};

use super::decode;

/// Maximum disk cache size in bytes (200 MB default).
pub const DEFAULT_MAX_CACHE_SIZE: u64 = 200 * 1024 * 1024;

const ENTRY_EXTENSION: &str = "img";
const PARTIAL_EXTENSION: &str = "tmp";

/// Disk-based image cache that persists raw image bytes.
///
/// Files are published with an atomic rename, so a `{key}.img` file is either
/// complete or absent. Any file that cannot be read or decoded counts as a miss.
pub struct DiskImageCache {
    cache_dir: PathBuf,
    max_size: u64,
    current_size: AtomicU64,
    item_count: AtomicUsize,
    write_lock: Mutex<()>,
}

impl DiskImageCache {
    /// Creates a new disk cache in the specified directory.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be created.
    pub async fn new(cache_dir: PathBuf, max_size: u64) -> CacheResult<Self> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;
        let mut total_size = 0u64;
        let mut count = 0usize;

        let mut entries = fs::read_dir(&cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read cache dir: {e}")))?;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if has_extension(&path, PARTIAL_EXTENSION) {
                let _ = fs::remove_file(&path).await;
                continue;
            }
            if has_extension(&path, ENTRY_EXTENSION)
                && let Ok(meta) = entry.metadata().await
            {
                total_size += meta.len();
                count += 1;
            }
        }

        debug!(
            path = %cache_dir.display(),
            size = total_size,
            count = count,
            "Opened disk image cache"
        );

        let cache = Self {
            cache_dir,
            max_size,
            current_size: AtomicU64::new(total_size),
            item_count: AtomicUsize::new(count),
            write_lock: Mutex::new(()),
        };

        {
            let _guard = cache.write_lock.lock().await;
            cache.cleanup_if_needed(None).await;
        }

        Ok(cache)
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path for a cached image.
    fn cache_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{ENTRY_EXTENSION}", key.as_str()))
    }

    /// Gets raw image bytes from disk cache without validating them.
    pub async fn get_bytes(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let path = self.cache_path(key);
        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(key = %key, path = %path.display(), "Disk cache hit");
                Some(bytes)
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(key = %key, error = %e, "Failed to read disk cache file");
                }
                trace!(key = %key, "Disk cache miss");
                None
            }
        }
    }

    /// Loads a cached entry, validating that it still decodes.
    ///
    /// Corrupt files are removed and reported as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let bytes = bytes::Bytes::from(self.get_bytes(key).await?);

        match decode::validate_image(bytes.clone()).await {
            Ok(format) => {
                debug!(key = %key, size = bytes.len(), "Loaded image from disk cache");
                Some(
                    CacheEntry::new(key.clone(), bytes)
                        .with_content_type(decode::content_type_for(format)),
                )
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding corrupt disk cache entry");
                self.evict(key).await;
                None
            }
        }
    }

    /// Stores an entry in the disk cache, replacing any existing file.
    ///
    /// # Errors
    /// Returns error if file cannot be created or written.
    pub async fn put(&self, entry: &CacheEntry) -> CacheResult<()> {
        self.put_bytes(&entry.key, &entry.bytes).await
    }

    /// Stores raw bytes in the disk cache.
    ///
    /// # Errors
    /// Returns error if file cannot be created or written.
    pub async fn put_bytes(&self, key: &CacheKey, bytes: &[u8]) -> CacheResult<()> {
        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;

        let path = self.cache_path(key);
        let partial = self.cache_dir.join(format!(
            "{}.{}.{PARTIAL_EXTENSION}",
            key.as_str(),
            uuid::Uuid::new_v4().simple()
        ));

        let old_size = fs::metadata(&path).await.map(|m| m.len()).ok();

        if let Err(e) = write_file(&partial, bytes).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&partial, &path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(CacheError::IoError(format!(
                "Failed to publish cache file: {e}"
            )));
        }

        let new_size = bytes.len() as u64;
        if let Some(old) = old_size {
            if new_size > old {
                self.current_size
                    .fetch_add(new_size - old, Ordering::Relaxed);
            } else {
                self.shrink(old - new_size, 0);
            }
        } else {
            self.current_size.fetch_add(new_size, Ordering::Relaxed);
            self.item_count.fetch_add(1, Ordering::Relaxed);
        }

        debug!(key = %key, path = %path.display(), size = bytes.len(), "Stored image in disk cache");

        self.cleanup_if_needed(Some(&path)).await;

        Ok(())
    }

    /// Removes an image from disk cache.
    pub async fn evict(&self, key: &CacheKey) {
        let _guard = self.write_lock.lock().await;
        let path = self.cache_path(key);
        let size = fs::metadata(&path).await.map(|m| m.len()).ok();
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(key = %key, error = %e, "Failed to evict from disk cache");
            }
        } else if let Some(s) = size {
            self.shrink(s, 1);
            debug!(key = %key, "Evicted from disk cache");
        }
    }

    /// Clears the entire disk cache.
    ///
    /// # Errors
    /// Returns error if cache directory cannot be read.
    pub async fn clear(&self) -> CacheResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = fs::read_dir(&self.cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read cache dir: {e}")))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to read entry: {e}")))?
        {
            let path = entry.path();
            if has_extension(&path, ENTRY_EXTENSION) && fs::remove_file(&path).await.is_err() {
                warn!(path = %path.display(), "Failed to remove cache file");
            }
        }
        self.current_size.store(0, Ordering::Relaxed);
        self.item_count.store(0, Ordering::Relaxed);
        debug!("Cleared disk cache");
        Ok(())
    }

    /// Returns the current cache size in bytes.
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    /// Returns the number of cached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.item_count.load(Ordering::Relaxed)
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lowers the counters, stopping at zero. Other processes sharing the
    /// directory can remove files this instance never counted.
    fn shrink(&self, size: u64, count: usize) {
        let _ = self
            .current_size
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.saturating_sub(size))
            });
        let _ = self
            .item_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.saturating_sub(count))
            });
    }

    /// Cleans up least recently accessed entries if over the size limit.
    ///
    /// The counters are rebuilt from the directory scan, so files written by
    /// other processes are accounted for. `keep` is never removed.
    /// Callers must hold the write lock.
    async fn cleanup_if_needed(&self, keep: Option<&Path>) {
        let current_size = self.current_size();
        if current_size <= self.max_size {
            return;
        }

        debug!(
            current_size = current_size,
            max_size = self.max_size,
            "Disk cache over limit, cleaning up"
        );

        let Ok(mut entries) = fs::read_dir(&self.cache_dir).await else {
            return;
        };

        let mut files: Vec<(PathBuf, std::time::SystemTime, u64)> = Vec::new();
        let mut scanned_size = 0u64;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if !has_extension(&path, ENTRY_EXTENSION) {
                continue;
            }

            if let Ok(meta) = entry.metadata().await {
                let accessed = meta
                    .accessed()
                    .or_else(|_| meta.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                scanned_size += meta.len();
                files.push((path, accessed, meta.len()));
            }
        }

        files.sort_by_key(|(_, time, _)| *time);

        let scanned_count = files.len();
        let mut freed_size = 0u64;
        let mut freed_count = 0usize;
        let target = scanned_size.saturating_sub(self.max_size) + (self.max_size / 10);

        for (path, _, size) in files {
            if freed_size >= target {
                break;
            }
            if keep.is_some_and(|k| k == path.as_path()) {
                continue;
            }

            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove old cache file");
            } else {
                debug!(path = %path.display(), "Removed old cache file");
                freed_size += size;
                freed_count += 1;
            }
        }
        self.current_size
            .store(scanned_size.saturating_sub(freed_size), Ordering::Relaxed);
        self.item_count
            .store(scanned_count - freed_count, Ordering::Relaxed);

        debug!(
            freed_size = freed_size,
            freed_count = freed_count,
            "Disk cache cleanup complete"
        );
    }

    /// Checks if an image is cached.
    pub async fn contains(&self, key: &CacheKey) -> bool {
        let path = self.cache_path(key);
        fs::try_exists(&path).await.unwrap_or(false)
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> CacheResult<()> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| CacheError::IoError(format!("Failed to create cache file: {e}")))?;

    file.write_all(bytes)
        .await
        .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;

    file.sync_all()
        .await
        .map_err(|e| CacheError::IoError(format!("Failed to flush cache file: {e}")))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

/// Returns the default cache directory path.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "recipeshelf", "recipeshelf").map_or_else(
        || {
            std::env::temp_dir()
                .join("recipeshelf")
                .join("cache")
                .join("images")
        },
        |dirs| dirs.cache_dir().join("images"),
    )
}
