//! Test repositories — in-memory and failing implementations of the
//! repository traits.

use std::sync::Mutex;

use async_trait::async_trait;
use recipe_core::error::DomainError;
use recipe_core::model::{Ingredient, PageRequest, Recipe, RecipeFilter};
use recipe_core::repository::{IngredientRepository, RecipeRepository};
use uuid::Uuid;

/// Unique index on `lower(ingredients.name)`.
pub const INGREDIENT_NAME_CONSTRAINT: &str = "ingredients_name_lower_key";
/// Unique index on `lower(recipes.name)`.
pub const RECIPE_NAME_CONSTRAINT: &str = "recipes_name_lower_key";
/// Foreign key from `recipe_ingredients.ingredient_id` to `ingredients.id`.
pub const INGREDIENT_REFERENCE_CONSTRAINT: &str = "recipe_ingredients_ingredient_id_fkey";

/// An in-memory catalog implementing both repository traits over shared
/// state. Mirrors the store's unique and foreign-key constraints so that
/// integrity failures can be exercised without a database.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    ingredients: Mutex<Vec<Ingredient>>,
    recipes: Mutex<Vec<Recipe>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-populated with `ingredients`.
    #[must_use]
    pub fn with_ingredients(ingredients: Vec<Ingredient>) -> Self {
        Self {
            ingredients: Mutex::new(ingredients),
            recipes: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of the stored ingredients.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.ingredients.lock().unwrap().clone()
    }

    /// Returns a snapshot of the stored recipes.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn recipes(&self) -> Vec<Recipe> {
        self.recipes.lock().unwrap().clone()
    }
}

fn violation(constraint: &str) -> DomainError {
    DomainError::DataIntegrity {
        message: format!("violates constraint \"{constraint}\""),
        constraint: Some(constraint.to_owned()),
        caused_by_constraint: true,
    }
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest, name: impl Fn(&T) -> String) -> Vec<T> {
    items.sort_by_key(|item| name(item).to_lowercase());
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let size = usize::try_from(page.size()).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(size).collect()
}

#[async_trait]
impl IngredientRepository for InMemoryCatalog {
    async fn find_by_name_ignore_case(
        &self,
        name: &str,
    ) -> Result<Option<Ingredient>, DomainError> {
        let wanted = name.to_lowercase();
        Ok(self
            .ingredients
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ingredient>, DomainError> {
        Ok(self
            .ingredients
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn find_all_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Ingredient>, DomainError> {
        Ok(self
            .ingredients
            .lock()
            .unwrap()
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self, page: PageRequest) -> Result<Vec<Ingredient>, DomainError> {
        let all = self.ingredients.lock().unwrap().clone();
        Ok(paginate(all, page, |i| i.name.clone()))
    }

    async fn save(&self, ingredient: &Ingredient) -> Result<(), DomainError> {
        let mut ingredients = self.ingredients.lock().unwrap();
        let wanted = ingredient.name.to_lowercase();
        if ingredients
            .iter()
            .any(|i| i.id != ingredient.id && i.name.to_lowercase() == wanted)
        {
            return Err(violation(INGREDIENT_NAME_CONSTRAINT));
        }
        ingredients.retain(|i| i.id != ingredient.id);
        ingredients.push(ingredient.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let referenced = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.ingredients.iter().any(|i| i.id == id));
        if referenced {
            return Err(violation(INGREDIENT_REFERENCE_CONSTRAINT));
        }
        let mut ingredients = self.ingredients.lock().unwrap();
        let before = ingredients.len();
        ingredients.retain(|i| i.id != id);
        Ok(ingredients.len() != before)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryCatalog {
    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Recipe>, DomainError> {
        let wanted = name.to_lowercase();
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, DomainError> {
        Ok(self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_all(&self, page: PageRequest) -> Result<Vec<Recipe>, DomainError> {
        let all = self.recipes.lock().unwrap().clone();
        Ok(paginate(all, page, |r| r.name.clone()))
    }

    async fn search(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, DomainError> {
        let matching: Vec<Recipe> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        Ok(paginate(matching, page, |r| r.name.clone()))
    }

    async fn save(&self, recipe: &Recipe) -> Result<(), DomainError> {
        let mut recipes = self.recipes.lock().unwrap();
        let wanted = recipe.name.to_lowercase();
        if recipes
            .iter()
            .any(|r| r.id != recipe.id && r.name.to_lowercase() == wanted)
        {
            return Err(violation(RECIPE_NAME_CONSTRAINT));
        }
        recipes.retain(|r| r.id != recipe.id);
        recipes.push(recipe.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut recipes = self.recipes.lock().unwrap();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok(recipes.len() != before)
    }
}

/// A repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingRepository;

fn refused<T>() -> Result<T, DomainError> {
    Err(DomainError::Infrastructure("connection refused".into()))
}

#[async_trait]
impl IngredientRepository for FailingRepository {
    async fn find_by_name_ignore_case(
        &self,
        _name: &str,
    ) -> Result<Option<Ingredient>, DomainError> {
        refused()
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Ingredient>, DomainError> {
        refused()
    }

    async fn find_all_by_ids(&self, _ids: &[Uuid]) -> Result<Vec<Ingredient>, DomainError> {
        refused()
    }

    async fn find_all(&self, _page: PageRequest) -> Result<Vec<Ingredient>, DomainError> {
        refused()
    }

    async fn save(&self, _ingredient: &Ingredient) -> Result<(), DomainError> {
        refused()
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool, DomainError> {
        refused()
    }
}

#[async_trait]
impl RecipeRepository for FailingRepository {
    async fn find_by_name_ignore_case(&self, _name: &str) -> Result<Option<Recipe>, DomainError> {
        refused()
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Recipe>, DomainError> {
        refused()
    }

    async fn find_all(&self, _page: PageRequest) -> Result<Vec<Recipe>, DomainError> {
        refused()
    }

    async fn search(
        &self,
        _filter: &RecipeFilter,
        _page: PageRequest,
    ) -> Result<Vec<Recipe>, DomainError> {
        refused()
    }

    async fn save(&self, _recipe: &Recipe) -> Result<(), DomainError> {
        refused()
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool, DomainError> {
        refused()
    }
}
