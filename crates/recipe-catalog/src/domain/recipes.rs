//! Rules for recipes and their ingredient links.

use std::collections::HashSet;

use recipe_core::error::{DomainError, Failure};
use recipe_core::model::Ingredient;
use uuid::Uuid;

use super::ingredients;

/// A recipe with this name already exists.
#[must_use]
pub fn duplicate(name: &str) -> DomainError {
    DomainError::RecipeDuplicate(Failure::with_message(format!("{name} already exists")))
}

/// No recipe has this identifier.
#[must_use]
pub fn not_found(id: Uuid) -> DomainError {
    DomainError::RecipeNotFound(Failure::with_message(format!("Recipe {id} not found")))
}

/// A recipe links each ingredient at most once.
///
/// # Errors
///
/// Returns `DomainError::ConstraintViolation` naming the first repeated id.
pub fn ensure_distinct(ingredient_ids: &[Uuid]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(ingredient_ids.len());
    for id in ingredient_ids {
        if !seen.insert(id) {
            return Err(DomainError::ConstraintViolation(format!(
                "ingredient {id} is listed more than once"
            )));
        }
    }
    Ok(())
}

/// Matches the requested ids against the ingredients found in the store and
/// returns them sorted by name.
///
/// # Errors
///
/// Returns `DomainError::IngredientNotFound` for the first requested id that
/// was not found.
pub fn resolve_ingredients(
    requested: &[Uuid],
    mut found: Vec<Ingredient>,
) -> Result<Vec<Ingredient>, DomainError> {
    if let Some(missing) = requested
        .iter()
        .find(|id| !found.iter().any(|i| i.id == **id))
    {
        return Err(ingredients::not_found_by_id(*missing));
    }
    found.retain(|i| requested.contains(&i.id));
    found.sort_by_key(|i| i.name.to_lowercase());
    Ok(found)
}
