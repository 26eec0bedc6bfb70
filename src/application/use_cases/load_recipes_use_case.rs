//! Load recipes use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::RecipeListState;
use crate::domain::ports::RecipeCatalogPort;

/// Loads the recipe list and maps every outcome to a displayable state.
#[derive(Clone)]
pub struct LoadRecipesUseCase {
    catalog: Arc<dyn RecipeCatalogPort>,
}

impl LoadRecipesUseCase {
    /// Creates new load recipes use case.
    #[must_use]
    pub const fn new(catalog: Arc<dyn RecipeCatalogPort>) -> Self {
        Self { catalog }
    }

    /// Fetches the recipe list. Never fails; failures become
    /// [`RecipeListState::Failed`].
    pub async fn execute(&self) -> RecipeListState {
        debug!("Loading recipes");

        match self.catalog.fetch_recipes().await {
            Ok(recipes) if recipes.is_empty() => {
                info!("Recipe list is empty");
                RecipeListState::empty()
            }
            Ok(recipes) => {
                info!(count = recipes.len(), "Loaded recipes");
                RecipeListState::Loaded(recipes)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load recipes");
                RecipeListState::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{EMPTY_MESSAGE, FAILURE_MESSAGE};
    use crate::domain::entities::Recipe;
    use crate::domain::errors::RecipeError;
    use crate::domain::ports::mocks::MockRecipeCatalogPort;
    use uuid::Uuid;

    fn use_case(catalog: MockRecipeCatalogPort) -> LoadRecipesUseCase {
        LoadRecipesUseCase::new(Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_loaded_recipes() {
        let mut catalog = MockRecipeCatalogPort::new();
        catalog
            .expect_fetch_recipes()
            .times(1)
            .returning(|| Ok(vec![Recipe::new(Uuid::new_v4(), "Apam Balik", "Malaysian")]));

        let state = use_case(catalog).execute().await;

        assert_eq!(state.recipes().len(), 1);
        assert_eq!(state.message(), None);
    }

    #[tokio::test]
    async fn test_empty_list_shows_empty_state() {
        let mut catalog = MockRecipeCatalogPort::new();
        catalog.expect_fetch_recipes().returning(|| Ok(Vec::new()));

        let state = use_case(catalog).execute().await;

        assert_eq!(state, RecipeListState::empty());
        assert_eq!(state.message(), Some(EMPTY_MESSAGE));
        assert!(state.recipes().is_empty());
    }

    #[tokio::test]
    async fn test_failure_shows_error_state() {
        let mut catalog = MockRecipeCatalogPort::new();
        catalog
            .expect_fetch_recipes()
            .returning(|| Err(RecipeError::BadServerResponse { status: 500 }));

        let state = use_case(catalog).execute().await;

        assert!(state.is_failed());
        assert_eq!(state.message(), Some(FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_decoding_failure_shows_error_state() {
        let mut catalog = MockRecipeCatalogPort::new();
        catalog
            .expect_fetch_recipes()
            .returning(|| Err(RecipeError::decoding("missing field `name`")));

        assert!(use_case(catalog).execute().await.is_failed());
    }
}
