//! Shared application state.

use std::sync::Arc;

use recipe_core::clock::Clock;
use recipe_core::repository::{IngredientRepository, RecipeRepository};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for entity timestamps.
    pub clock: Arc<dyn Clock>,
    /// Ingredient persistence.
    pub ingredient_repository: Arc<dyn IngredientRepository>,
    /// Recipe persistence.
    pub recipe_repository: Arc<dyn RecipeRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ingredient_repository: Arc<dyn IngredientRepository>,
        recipe_repository: Arc<dyn RecipeRepository>,
    ) -> Self {
        Self {
            clock,
            ingredient_repository,
            recipe_repository,
        }
    }
}
