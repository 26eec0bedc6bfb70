//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with byte-budgeted LRU eviction
//! - Disk caching for persistence
//! - HTTP fetching with payload validation
//! - The tiered acquisition coordinator

pub mod cache_service;
pub mod decode;
pub mod disk_cache;
pub mod fetcher;
pub mod memory_cache;

pub use cache_service::{CacheService, CacheServiceConfig, ImageLoadedEvent};
pub use disk_cache::{DiskImageCache, default_cache_dir};
pub use fetcher::HttpImageFetcher;
pub use memory_cache::{CacheStats, MemoryImageCache};
