//! Application services.

mod recipe_filter;

pub use recipe_filter::{cuisines, filter_by_cuisine};
