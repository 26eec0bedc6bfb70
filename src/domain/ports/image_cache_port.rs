//! Port definitions for image caching and retrieval.

use async_trait::async_trait;

use crate::domain::entities::{CacheEntry, CacheKey};
use crate::domain::errors::FetchError;

/// Port for a volatile image cache tier.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get an entry from the cache, marking it most recently used.
    /// Returns None if not cached.
    async fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Stores an entry, replacing any entry under the same key.
    async fn put(&self, entry: CacheEntry);

    /// Returns the current number of cached entries.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries from the cache.
    async fn clear(&self);
}

/// Port for retrieving raw image bytes from their origin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Performs a single retrieval of `url`.
    ///
    /// Succeeds only for a success status and a payload that decodes as a
    /// supported raster image.
    async fn fetch(&self, url: &str) -> Result<CacheEntry, FetchError>;
}
