//! Repository abstractions over the relational store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{Ingredient, PageRequest, Recipe, RecipeFilter};

/// Lookup and persistence of ingredients.
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Finds the ingredient whose name equals `name` ignoring case.
    async fn find_by_name_ignore_case(
        &self,
        name: &str,
    ) -> Result<Option<Ingredient>, DomainError>;

    /// Finds an ingredient by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ingredient>, DomainError>;

    /// Finds every ingredient whose identifier is in `ids`. Unknown ids are
    /// skipped; the result order is unspecified.
    async fn find_all_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Ingredient>, DomainError>;

    /// Returns one page of ingredients ordered by name.
    async fn find_all(&self, page: PageRequest) -> Result<Vec<Ingredient>, DomainError>;

    /// Inserts a new ingredient.
    async fn save(&self, ingredient: &Ingredient) -> Result<(), DomainError>;

    /// Deletes an ingredient. Returns `false` if nothing was deleted.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError>;
}

/// Lookup and persistence of recipes and their ingredient links.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Finds the recipe whose name equals `name` ignoring case.
    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Recipe>, DomainError>;

    /// Finds a recipe by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, DomainError>;

    /// Returns one page of recipes ordered by name.
    async fn find_all(&self, page: PageRequest) -> Result<Vec<Recipe>, DomainError>;

    /// Returns one page of recipes matching `filter`, ordered by name.
    async fn search(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, DomainError>;

    /// Inserts the recipe, or replaces it and its ingredient links if a recipe
    /// with the same id exists.
    async fn save(&self, recipe: &Recipe) -> Result<(), DomainError>;

    /// Deletes a recipe. Returns `false` if nothing was deleted.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError>;
}
