//! Data transfer objects.

mod recipe_dto;

pub use recipe_dto::{EMPTY_MESSAGE, FAILURE_MESSAGE, RecipeListState};
