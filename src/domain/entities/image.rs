//! Domain types for image acquisition and caching.

use bytes::Bytes;

/// Stable identifier for a cached image, shared by every cache tier.
/// Generated from a SHA-256 hash of the full resource URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates a new `CacheKey` from any string-like input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Creates a `CacheKey` from a URL by hashing it.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Raw image bytes stored in a cache tier.
///
/// Entries are immutable and replaced as a whole. Each tier owns its own
/// entry; writing to one tier never touches another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Key the entry is stored under.
    pub key: CacheKey,
    /// Encoded image payload.
    pub bytes: Bytes,
    /// MIME type (e.g., "image/png") if known.
    pub content_type: Option<String>,
}

impl CacheEntry {
    /// Creates an entry without a content type.
    #[must_use]
    pub fn new(key: CacheKey, bytes: impl Into<Bytes>) -> Self {
        Self {
            key,
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Re-keys the entry.
    #[must_use]
    pub fn with_key(mut self, key: CacheKey) -> Self {
        self.key = key;
        self
    }

    /// Size of the payload in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Where an image was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory LRU cache.
    MemoryCache,
    /// Served from the disk cache.
    DiskCache,
    /// Downloaded from the network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskCache => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Result of a successful acquisition.
#[derive(Debug, Clone)]
pub struct AcquiredImage {
    /// The cached entry.
    pub entry: CacheEntry,
    /// Tier that satisfied the request.
    pub source: ImageSource,
}

impl AcquiredImage {
    /// Creates a new acquired image.
    #[must_use]
    pub const fn new(entry: CacheEntry, source: ImageSource) -> Self {
        Self { entry, source }
    }

    /// Returns the image bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.entry.bytes
    }

    /// Returns the cache key.
    #[must_use]
    pub const fn key(&self) -> &CacheKey {
        &self.entry.key
    }

    /// Consumes the result, returning only the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.entry.bytes
    }
}
