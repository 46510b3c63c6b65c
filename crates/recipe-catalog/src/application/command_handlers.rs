//! Command handlers for the catalog context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain rules: check uniqueness, resolve references, persist.

use recipe_core::clock::Clock;
use recipe_core::error::DomainError;
use recipe_core::model::{Ingredient, Recipe, RecipeType};
use recipe_core::repository::{IngredientRepository, RecipeRepository};
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::{
    CreateIngredient, CreateRecipe, DeleteIngredient, DeleteRecipe, UpdateRecipe,
};
use crate::domain::{ingredients, recipes};

/// Handles the `CreateIngredient` command: rejects a case-insensitive name
/// clash and persists the new ingredient.
///
/// # Errors
///
/// Returns `DomainError::IngredientDuplicate` if the name is taken, or any
/// error raised by the repository.
pub async fn handle_create_ingredient(
    command: &CreateIngredient,
    clock: &dyn Clock,
    repo: &dyn IngredientRepository,
) -> Result<Ingredient, DomainError> {
    let name = ingredients::normalize_name(&command.name);
    if repo.find_by_name_ignore_case(&name).await?.is_some() {
        return Err(ingredients::duplicate(&name));
    }

    let ingredient = ingredients::new_ingredient(&name, clock);
    repo.save(&ingredient).await?;

    info!(
        correlation_id = %command.correlation_id,
        ingredient_id = %ingredient.id,
        "ingredient created"
    );
    Ok(ingredient)
}

/// Handles the `DeleteIngredient` command.
///
/// # Errors
///
/// Returns `DomainError::IngredientNotFound` if no ingredient has the id, or
/// `DomainError::DataIntegrity` if a recipe still uses it.
pub async fn handle_delete_ingredient(
    command: &DeleteIngredient,
    repo: &dyn IngredientRepository,
) -> Result<(), DomainError> {
    if !repo.delete_by_id(command.ingredient_id).await? {
        return Err(ingredients::not_found_by_id(command.ingredient_id));
    }

    info!(
        correlation_id = %command.correlation_id,
        ingredient_id = %command.ingredient_id,
        "ingredient deleted"
    );
    Ok(())
}

/// Fields shared by the create and update recipe commands.
struct RecipeContents<'a> {
    name: &'a str,
    recipe_type: RecipeType,
    number_of_servings: i32,
    instructions: &'a str,
    ingredient_ids: &'a [Uuid],
}

/// Checks the name against other recipes and resolves the ingredient ids.
async fn prepare(
    recipe_id: Uuid,
    contents: &RecipeContents<'_>,
    ingredient_repo: &dyn IngredientRepository,
    recipe_repo: &dyn RecipeRepository,
) -> Result<(String, Vec<Ingredient>), DomainError> {
    let name = ingredients::normalize_name(contents.name);
    if let Some(existing) = recipe_repo.find_by_name_ignore_case(&name).await?
        && existing.id != recipe_id
    {
        return Err(recipes::duplicate(&name));
    }

    recipes::ensure_distinct(contents.ingredient_ids)?;
    let found = ingredient_repo
        .find_all_by_ids(contents.ingredient_ids)
        .await?;
    let linked = recipes::resolve_ingredients(contents.ingredient_ids, found)?;
    Ok((name, linked))
}

/// Handles the `CreateRecipe` command: rejects a case-insensitive name clash,
/// resolves the ingredients and persists the recipe.
///
/// # Errors
///
/// Returns `DomainError::RecipeDuplicate` if the name is taken,
/// `DomainError::ConstraintViolation` if an ingredient is listed twice,
/// `DomainError::IngredientNotFound` for an unknown ingredient, or any error
/// raised by the repositories.
pub async fn handle_create_recipe(
    command: &CreateRecipe,
    clock: &dyn Clock,
    ingredient_repo: &dyn IngredientRepository,
    recipe_repo: &dyn RecipeRepository,
) -> Result<Recipe, DomainError> {
    let recipe_id = Uuid::now_v7();
    let contents = RecipeContents {
        name: &command.name,
        recipe_type: command.recipe_type,
        number_of_servings: command.number_of_servings,
        instructions: &command.instructions,
        ingredient_ids: &command.ingredient_ids,
    };
    let (name, linked) = prepare(recipe_id, &contents, ingredient_repo, recipe_repo).await?;

    let now = clock.now();
    let recipe = Recipe {
        id: recipe_id,
        name,
        recipe_type: contents.recipe_type,
        number_of_servings: contents.number_of_servings,
        instructions: contents.instructions.trim().to_owned(),
        ingredients: linked,
        created_at: now,
        updated_at: now,
    };
    recipe_repo.save(&recipe).await?;

    info!(
        correlation_id = %command.correlation_id,
        recipe_id = %recipe.id,
        "recipe created"
    );
    Ok(recipe)
}

/// Handles the `UpdateRecipe` command: replaces every field of an existing
/// recipe, keeping its creation time.
///
/// # Errors
///
/// Returns `DomainError::RecipeNotFound` if no recipe has the id, plus the
/// errors of [`handle_create_recipe`].
pub async fn handle_update_recipe(
    command: &UpdateRecipe,
    clock: &dyn Clock,
    ingredient_repo: &dyn IngredientRepository,
    recipe_repo: &dyn RecipeRepository,
) -> Result<Recipe, DomainError> {
    let existing = recipe_repo
        .find_by_id(command.recipe_id)
        .await?
        .ok_or_else(|| recipes::not_found(command.recipe_id))?;

    let contents = RecipeContents {
        name: &command.name,
        recipe_type: command.recipe_type,
        number_of_servings: command.number_of_servings,
        instructions: &command.instructions,
        ingredient_ids: &command.ingredient_ids,
    };
    let (name, linked) = prepare(existing.id, &contents, ingredient_repo, recipe_repo).await?;

    let recipe = Recipe {
        id: existing.id,
        name,
        recipe_type: contents.recipe_type,
        number_of_servings: contents.number_of_servings,
        instructions: contents.instructions.trim().to_owned(),
        ingredients: linked,
        created_at: existing.created_at,
        updated_at: clock.now(),
    };
    recipe_repo.save(&recipe).await?;

    info!(
        correlation_id = %command.correlation_id,
        recipe_id = %recipe.id,
        "recipe updated"
    );
    Ok(recipe)
}

/// Handles the `DeleteRecipe` command.
///
/// # Errors
///
/// Returns `DomainError::RecipeNotFound` if no recipe has the id.
pub async fn handle_delete_recipe(
    command: &DeleteRecipe,
    repo: &dyn RecipeRepository,
) -> Result<(), DomainError> {
    if !repo.delete_by_id(command.recipe_id).await? {
        return Err(recipes::not_found(command.recipe_id));
    }

    info!(
        correlation_id = %command.correlation_id,
        recipe_id = %command.recipe_id,
        "recipe deleted"
    );
    Ok(())
}
