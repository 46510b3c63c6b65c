//! Query handlers for the catalog context.
//!
//! This module contains query handlers that read ingredients and recipes and
//! return read-only view DTOs.

use chrono::{DateTime, Utc};
use recipe_core::error::DomainError;
use recipe_core::model::{Ingredient, PageRequest, Recipe, RecipeFilter, RecipeType};
use recipe_core::repository::{IngredientRepository, RecipeRepository};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ingredients, recipes};

/// Read-only view of an ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientView {
    /// The ingredient identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Ingredient> for IngredientView {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            created_at: ingredient.created_at,
        }
    }
}

/// Read-only view of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeView {
    /// The recipe identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Dietary classification.
    pub recipe_type: RecipeType,
    /// How many people the recipe serves.
    pub number_of_servings: i32,
    /// Preparation steps.
    pub instructions: String,
    /// Linked ingredients (sorted by name).
    pub ingredients: Vec<IngredientView>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeView {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            recipe_type: recipe.recipe_type,
            number_of_servings: recipe.number_of_servings,
            instructions: recipe.instructions,
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// Retrieves an ingredient by its ID.
///
/// # Errors
///
/// Returns `DomainError::IngredientNotFound` if no ingredient has the ID.
pub async fn get_ingredient_by_id(
    ingredient_id: Uuid,
    repo: &dyn IngredientRepository,
) -> Result<IngredientView, DomainError> {
    repo.find_by_id(ingredient_id)
        .await?
        .map(IngredientView::from)
        .ok_or_else(|| ingredients::not_found_by_id(ingredient_id))
}

/// Retrieves an ingredient by name, ignoring case.
///
/// # Errors
///
/// Returns `DomainError::IngredientNotFound` (`"<name> not found"`) if no
/// ingredient has the name.
pub async fn find_ingredient_by_name(
    name: &str,
    repo: &dyn IngredientRepository,
) -> Result<IngredientView, DomainError> {
    let name = ingredients::normalize_name(name);
    repo.find_by_name_ignore_case(&name)
        .await?
        .map(IngredientView::from)
        .ok_or_else(|| ingredients::not_found_by_name(&name))
}

/// Lists one page of ingredients ordered by name.
///
/// # Errors
///
/// Returns any error raised by the repository.
pub async fn list_ingredients(
    page: PageRequest,
    repo: &dyn IngredientRepository,
) -> Result<Vec<IngredientView>, DomainError> {
    let found = repo.find_all(page).await?;
    Ok(found.into_iter().map(IngredientView::from).collect())
}

/// Retrieves a recipe by its ID.
///
/// # Errors
///
/// Returns `DomainError::RecipeNotFound` if no recipe has the ID.
pub async fn get_recipe_by_id(
    recipe_id: Uuid,
    repo: &dyn RecipeRepository,
) -> Result<RecipeView, DomainError> {
    repo.find_by_id(recipe_id)
        .await?
        .map(RecipeView::from)
        .ok_or_else(|| recipes::not_found(recipe_id))
}

/// Lists one page of recipes ordered by name.
///
/// # Errors
///
/// Returns any error raised by the repository.
pub async fn list_recipes(
    page: PageRequest,
    repo: &dyn RecipeRepository,
) -> Result<Vec<RecipeView>, DomainError> {
    let found = repo.find_all(page).await?;
    Ok(found.into_iter().map(RecipeView::from).collect())
}

/// Lists one page of recipes matching every criterion of `filter`.
///
/// Ingredient names and the instruction text are trimmed; blank entries are
/// dropped.
///
/// # Errors
///
/// Returns any error raised by the repository.
pub async fn search_recipes(
    filter: &RecipeFilter,
    page: PageRequest,
    repo: &dyn RecipeRepository,
) -> Result<Vec<RecipeView>, DomainError> {
    let clean = |names: &[String]| -> Vec<String> {
        names
            .iter()
            .map(|n| ingredients::normalize_name(n))
            .filter(|n| !n.is_empty())
            .collect()
    };
    let filter = RecipeFilter {
        recipe_type: filter.recipe_type,
        number_of_servings: filter.number_of_servings,
        include_ingredients: clean(&filter.include_ingredients),
        exclude_ingredients: clean(&filter.exclude_ingredients),
        instruction_text: filter
            .instruction_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned),
    };

    let found = repo.search(&filter, page).await?;
    Ok(found.into_iter().map(RecipeView::from).collect())
}
