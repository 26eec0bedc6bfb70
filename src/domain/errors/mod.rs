//! Domain error types.

mod acquire_error;
mod cache_error;
mod recipe_error;

pub use acquire_error::{AcquireError, FetchError};
pub use cache_error::{CacheError, CacheResult};
pub use recipe_error::RecipeError;
