//! Catalog entities shared by the store and application layers.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A single ingredient. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient identifier.
    pub id: Uuid,
    /// Display name, trimmed.
    pub name: String,
    /// When the ingredient was first stored.
    pub created_at: DateTime<Utc>,
}

/// Dietary classification of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeType {
    /// Contains no meat or fish.
    Vegetarian,
    /// Everything else.
    Other,
}

impl RecipeType {
    /// The value stored in the `recipe_type` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vegetarian => "VEGETARIAN",
            Self::Other => "OTHER",
        }
    }
}

impl FromStr for RecipeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VEGETARIAN" => Ok(Self::Vegetarian),
            "OTHER" => Ok(Self::Other),
            other => Err(DomainError::Infrastructure(format!(
                "unknown recipe type stored: {other}"
            ))),
        }
    }
}

/// A recipe together with its resolved ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Recipe identifier.
    pub id: Uuid,
    /// Display name, trimmed. Unique ignoring case.
    pub name: String,
    /// Dietary classification.
    pub recipe_type: RecipeType,
    /// How many people the recipe serves.
    pub number_of_servings: i32,
    /// Free-text preparation steps.
    pub instructions: String,
    /// Ingredients, sorted by name.
    pub ingredients: Vec<Ingredient>,
    /// When the recipe was first stored.
    pub created_at: DateTime<Utc>,
    /// When the recipe was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Search criteria for recipes. Every criterion that is set must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Only recipes of this type.
    pub recipe_type: Option<RecipeType>,
    /// Only recipes serving exactly this many people.
    pub number_of_servings: Option<i32>,
    /// Ingredient names (ignoring case) that must all be present.
    pub include_ingredients: Vec<String>,
    /// Ingredient names (ignoring case) that must all be absent.
    pub exclude_ingredients: Vec<String>,
    /// Text (ignoring case) the instructions must contain.
    pub instruction_text: Option<String>,
}

impl RecipeFilter {
    /// Returns `true` if `recipe` satisfies every criterion of the filter.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if self.recipe_type.is_some_and(|t| t != recipe.recipe_type) {
            return false;
        }
        if self
            .number_of_servings
            .is_some_and(|n| n != recipe.number_of_servings)
        {
            return false;
        }

        let names: Vec<String> = recipe
            .ingredients
            .iter()
            .map(|i| i.name.to_lowercase())
            .collect();
        let has = |wanted: &String| names.contains(&wanted.to_lowercase());
        if !self.include_ingredients.iter().all(&has) {
            return false;
        }
        if self.exclude_ingredients.iter().any(&has) {
            return false;
        }

        match &self.instruction_text {
            Some(text) => recipe
                .instructions
                .to_lowercase()
                .contains(&text.to_lowercase()),
            None => true,
        }
    }
}

/// A zero-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `size` is zero or larger than
    /// [`MAX_PAGE_SIZE`].
    pub fn new(page: u32, size: u32) -> Result<Self, DomainError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(DomainError::InvalidArgument(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {size}"
            )));
        }
        Ok(Self { page, size })
    }

    /// Zero-based page index.
    #[must_use]
    pub fn page(self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub fn size(self) -> u32 {
        self.size
    }

    /// Number of items to skip.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}
