//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image handling (caching, fetching, tiered acquisition).
pub mod image;
/// Recipe list client.
pub mod recipes;

pub use config::{AppConfig, CliArgs, ConfigStore, LogLevel};
pub use image::{
    CacheService, CacheServiceConfig, CacheStats, DiskImageCache, HttpImageFetcher,
    ImageLoadedEvent, MemoryImageCache,
};
pub use recipes::HttpRecipeClient;
