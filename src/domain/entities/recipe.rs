use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recipe as published by the recipe list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: String,
    /// Cuisine the recipe belongs to (e.g., "British").
    pub cuisine: String,
    /// Full-size photo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url_large: Option<String>,
    /// Thumbnail photo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url_small: Option<String>,
    /// Original recipe page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Video walkthrough.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
}

impl Recipe {
    /// Creates a recipe with only the required fields set.
    #[must_use]
    pub fn new(uuid: Uuid, name: impl Into<String>, cuisine: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            cuisine: cuisine.into(),
            photo_url_large: None,
            photo_url_small: None,
            source_url: None,
            youtube_url: None,
        }
    }
}
