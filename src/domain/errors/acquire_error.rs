//! Image acquisition error types.

use thiserror::Error;

/// Terminal failure of a single image acquisition.
///
/// Callers treat every variant as "no image" and show a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum AcquireError {
    #[error("invalid image resource {url:?}: {reason}")]
    InvalidResource { url: String, reason: String },

    #[error("network failure: {message}")]
    NetworkFailure { message: String },

    #[error("unexpected response status: HTTP {status}")]
    BadResponse { status: u16 },

    #[error("payload is not a valid image: {message}")]
    DecodeFailure { message: String },
}

impl AcquireError {
    /// Creates invalid resource error.
    #[must_use]
    pub fn invalid_resource(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResource {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates network failure error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
        }
    }

    /// Creates decode failure error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            message: message.into(),
        }
    }
}

/// Failure reported by an image fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("request failed: {message}")]
    Network { message: String },

    #[error("HTTP {status}")]
    BadResponse { status: u16 },

    #[error("decode failed: {message}")]
    Decode { message: String },
}

impl FetchError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<FetchError> for AcquireError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network { message } => Self::NetworkFailure { message },
            FetchError::BadResponse { status } => Self::BadResponse { status },
            FetchError::Decode { message } => Self::DecodeFailure { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_maps_to_acquire_error() {
        assert_eq!(
            AcquireError::from(FetchError::BadResponse { status: 404 }),
            AcquireError::BadResponse { status: 404 }
        );
        assert!(matches!(
            AcquireError::from(FetchError::network("refused")),
            AcquireError::NetworkFailure { .. }
        ));
        assert!(matches!(
            AcquireError::from(FetchError::decode("garbage")),
            AcquireError::DecodeFailure { .. }
        ));
    }

    #[test]
    fn test_display_includes_status() {
        let err = AcquireError::BadResponse { status: 503 };
        assert_eq!(err.to_string(), "unexpected response status: HTTP 503");
    }
}
