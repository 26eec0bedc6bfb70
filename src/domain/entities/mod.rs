//! Domain entity definitions.

mod image;
mod recipe;

pub use image::{AcquiredImage, CacheEntry, CacheKey, ImageSource};
pub use recipe::Recipe;
