//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{AcquiredImage, CacheEntry, CacheKey, ImageSource, Recipe};
pub use errors::{AcquireError, CacheError, FetchError, RecipeError};
pub use ports::{ImageCachePort, ImageFetcherPort, RecipeCatalogPort};
