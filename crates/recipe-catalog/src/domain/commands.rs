//! Commands for the catalog context.

use recipe_core::model::RecipeType;
use uuid::Uuid;

/// Command to create an ingredient.
#[derive(Debug, Clone)]
pub struct CreateIngredient {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requested name, as received.
    pub name: String,
}

/// Command to delete an ingredient.
#[derive(Debug, Clone)]
pub struct DeleteIngredient {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The ingredient identifier.
    pub ingredient_id: Uuid,
}

/// Command to create a recipe.
#[derive(Debug, Clone)]
pub struct CreateRecipe {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requested name, as received.
    pub name: String,
    /// Dietary classification.
    pub recipe_type: RecipeType,
    /// How many people the recipe serves.
    pub number_of_servings: i32,
    /// Preparation steps.
    pub instructions: String,
    /// Identifiers of the ingredients to link.
    pub ingredient_ids: Vec<Uuid>,
}

/// Command to replace the contents of an existing recipe.
#[derive(Debug, Clone)]
pub struct UpdateRecipe {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The recipe identifier.
    pub recipe_id: Uuid,
    /// The requested name, as received.
    pub name: String,
    /// Dietary classification.
    pub recipe_type: RecipeType,
    /// How many people the recipe serves.
    pub number_of_servings: i32,
    /// Preparation steps.
    pub instructions: String,
    /// Identifiers of the ingredients to link.
    pub ingredient_ids: Vec<Uuid>,
}

/// Command to delete a recipe.
#[derive(Debug, Clone)]
pub struct DeleteRecipe {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The recipe identifier.
    pub recipe_id: Uuid,
}
