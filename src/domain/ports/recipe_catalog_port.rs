//! Recipe catalog port definition.

use async_trait::async_trait;

use crate::domain::entities::Recipe;
use crate::domain::errors::RecipeError;

/// Port for fetching the published recipe list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCatalogPort: Send + Sync {
    /// Fetches all recipes.
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, RecipeError>;
}
