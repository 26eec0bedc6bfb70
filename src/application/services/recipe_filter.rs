use std::collections::BTreeSet;

use crate::domain::entities::Recipe;

/// Returns the distinct cuisines, sorted.
#[must_use]
pub fn cuisines(recipes: &[Recipe]) -> Vec<String> {
    recipes
        .iter()
        .map(|r| r.cuisine.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Returns recipes of the given cuisine, or all recipes when `cuisine` is `None`.
#[must_use]
pub fn filter_by_cuisine<'a>(recipes: &'a [Recipe], cuisine: Option<&str>) -> Vec<&'a Recipe> {
    match cuisine {
        Some(cuisine) => recipes.iter().filter(|r| r.cuisine == cuisine).collect(),
        None => recipes.iter().collect(),
    }
}
