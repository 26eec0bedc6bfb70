//! Recipe list DTOs.

use crate::domain::entities::Recipe;

/// Shown when the endpoint returns no recipes.
pub const EMPTY_MESSAGE: &str = "No recipes available.";

/// Shown when the recipe list cannot be loaded.
pub const FAILURE_MESSAGE: &str = "Failed to load recipes. Please try again.";

/// Outcome of loading the recipe list, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeListState {
    /// At least one recipe was loaded.
    Loaded(Vec<Recipe>),
    /// The endpoint returned an empty list.
    Empty {
        /// Message for the empty state.
        message: String,
    },
    /// The list could not be fetched or decoded.
    Failed {
        /// Message for the error state.
        message: String,
    },
}

impl RecipeListState {
    /// Creates the empty state.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty {
            message: EMPTY_MESSAGE.to_string(),
        }
    }

    /// Creates the failed state.
    #[must_use]
    pub fn failed() -> Self {
        Self::Failed {
            message: FAILURE_MESSAGE.to_string(),
        }
    }

    /// Returns the loaded recipes, or an empty slice.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        match self {
            Self::Loaded(recipes) => recipes,
            Self::Empty { .. } | Self::Failed { .. } => &[],
        }
    }

    /// Returns the message to show instead of a list, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Empty { message } | Self::Failed { message } => Some(message),
        }
    }

    /// Returns true if loading failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
