use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::dto::RecipeListResponse;
use crate::domain::entities::Recipe;
use crate::domain::errors::{CacheError, CacheResult, RecipeError};
use crate::domain::ports::RecipeCatalogPort;

/// Published recipe list.
pub const DEFAULT_RECIPES_ENDPOINT: &str = "https://d3jbb8n5wk0qxi.cloudfront.net/recipes.json";

/// Fetches the recipe list with a single unauthenticated GET.
#[derive(Debug, Clone)]
pub struct HttpRecipeClient {
    client: Client,
    endpoint: String,
}

impl HttpRecipeClient {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> CacheResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("recipeshelf/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::ClientError(format!("failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Creates a client around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RecipeCatalogPort for HttpRecipeClient {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, RecipeError> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            warn!(endpoint = %self.endpoint, error = %e, "Invalid recipe endpoint");
            RecipeError::bad_url(&self.endpoint)
        })?;

        debug!(url = %url, "Fetching recipe list");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach recipe endpoint");
            if e.is_timeout() {
                RecipeError::network("request timed out")
            } else {
                RecipeError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RecipeError::BadServerResponse {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RecipeError::network(format!("failed to read body: {e}")))?;

        let list: RecipeListResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse recipe list");
            RecipeError::decoding(e.to_string())
        })?;

        debug!(count = list.recipes.len(), "Recipe list fetched");

        Ok(list.recipes)
    }
}
