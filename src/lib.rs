//! Recipeshelf - a recipe browser backed by a tiered image cache.
//!
//! Images are acquired through [`infrastructure::CacheService`], which checks an
//! in-memory LRU, then a persistent disk cache, then the network, populating the
//! faster tiers on the way back.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_support;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
