//! Recipe list HTTP client.

mod client;
mod dto;

pub use client::{DEFAULT_RECIPES_ENDPOINT, HttpRecipeClient};
