//! Rules for ingredients.

use recipe_core::clock::Clock;
use recipe_core::error::{DomainError, Failure};
use recipe_core::model::Ingredient;
use uuid::Uuid;

/// Canonical form of a requested name: surrounding whitespace removed.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_owned()
}

/// Builds a new ingredient with a fresh identifier.
#[must_use]
pub fn new_ingredient(name: &str, clock: &dyn Clock) -> Ingredient {
    Ingredient {
        id: Uuid::now_v7(),
        name: normalize_name(name),
        created_at: clock.now(),
    }
}

/// An ingredient with this name already exists.
#[must_use]
pub fn duplicate(name: &str) -> DomainError {
    DomainError::IngredientDuplicate(Failure::with_message(format!("{name} already exists")))
}

/// No ingredient has this identifier.
#[must_use]
pub fn not_found_by_id(id: Uuid) -> DomainError {
    DomainError::IngredientNotFound(Failure::with_message(format!(
        "Ingredient {id} not found"
    )))
}

/// No ingredient has this name.
#[must_use]
pub fn not_found_by_name(name: &str) -> DomainError {
    DomainError::IngredientNotFound(Failure::with_message(format!("{name} not found")))
}
