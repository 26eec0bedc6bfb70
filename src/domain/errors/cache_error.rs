//! Cache infrastructure error types.

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors raised while setting up or writing to a cache tier.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// I/O error during cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    ClientError(String),
}
