//! Use case implementations.

mod load_recipes_use_case;

pub use load_recipes_use_case::LoadRecipesUseCase;
