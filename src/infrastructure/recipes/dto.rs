use serde::Deserialize;

use crate::domain::entities::Recipe;

/// Body of the recipe list endpoint.
#[derive(Debug, Deserialize)]
pub struct RecipeListResponse {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}
