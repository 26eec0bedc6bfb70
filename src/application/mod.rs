//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Stateless helpers over domain data.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::RecipeListState;
pub use services::{cuisines, filter_by_cuisine};
pub use use_cases::LoadRecipesUseCase;
