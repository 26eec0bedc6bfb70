mod image_cache_port;
mod recipe_catalog_port;

pub use image_cache_port::{ImageCachePort, ImageFetcherPort};
pub use recipe_catalog_port::RecipeCatalogPort;
