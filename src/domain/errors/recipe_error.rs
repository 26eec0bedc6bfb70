//! Recipe list error types.

use thiserror::Error;

/// Recipe list retrieval error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum RecipeError {
    #[error("invalid recipe endpoint {url:?}")]
    BadUrl { url: String },

    #[error("network error while fetching recipes: {message}")]
    Network { message: String },

    #[error("recipe endpoint returned HTTP {status}")]
    BadServerResponse { status: u16 },

    #[error("failed to decode recipe list: {message}")]
    Decoding { message: String },
}

impl RecipeError {
    /// Creates bad URL error.
    #[must_use]
    pub fn bad_url(url: impl Into<String>) -> Self {
        Self::BadUrl { url: url.into() }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decoding error.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }
}
