//! `PostgreSQL` implementation of the `RecipeRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use recipe_core::error::DomainError;
use recipe_core::model::{Ingredient, PageRequest, Recipe, RecipeFilter};
use recipe_core::repository::RecipeRepository;

use crate::error::{map_sqlx_error, to_bigint};

const RECIPE_COLUMNS: &str = "r.id, r.name, r.recipe_type, r.number_of_servings, \
                              r.instructions, r.created_at, r.updated_at";

/// Correlated sub-query matching a linked ingredient by name, ignoring case.
const HAS_INGREDIENT: &str = "SELECT 1 FROM recipe_ingredients ri \
                              JOIN ingredients i ON i.id = ri.ingredient_id \
                              WHERE ri.recipe_id = r.id AND LOWER(i.name) = LOWER(";

#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: Uuid,
    name: String,
    recipe_type: String,
    number_of_servings: i32,
    instructions: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    recipe_id: Uuid,
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

/// PostgreSQL-backed recipe repository.
#[derive(Debug, Clone)]
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    /// Creates a new `PgRecipeRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the ingredients of every recipe row and assembles the entities,
    /// keeping the row order.
    async fn hydrate(&self, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let links: Vec<LinkRow> = sqlx::query_as(
            "SELECT ri.recipe_id, i.id, i.name, i.created_at \
             FROM recipe_ingredients ri JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id = ANY($1) ORDER BY LOWER(i.name), i.id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut by_recipe: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
        for link in links {
            by_recipe.entry(link.recipe_id).or_default().push(Ingredient {
                id: link.id,
                name: link.name,
                created_at: link.created_at,
            });
        }

        rows.into_iter()
            .map(|row| {
                Ok(Recipe {
                    id: row.id,
                    recipe_type: row.recipe_type.parse()?,
                    ingredients: by_recipe.remove(&row.id).unwrap_or_default(),
                    name: row.name,
                    number_of_servings: row.number_of_servings,
                    instructions: row.instructions,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                })
            })
            .collect()
    }
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Recipe>, DomainError> {
        let rows: Vec<RecipeRow> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE LOWER(r.name) = LOWER($1)"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(self.hydrate(rows).await?.into_iter().next())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipe>, DomainError> {
        let rows: Vec<RecipeRow> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(self.hydrate(rows).await?.into_iter().next())
    }

    async fn find_all(&self, page: PageRequest) -> Result<Vec<Recipe>, DomainError> {
        self.search(&RecipeFilter::default(), page).await
    }

    async fn search(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, DomainError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE TRUE"));

        if let Some(recipe_type) = filter.recipe_type {
            query
                .push(" AND r.recipe_type = ")
                .push_bind(recipe_type.as_str());
        }
        if let Some(servings) = filter.number_of_servings {
            query
                .push(" AND r.number_of_servings = ")
                .push_bind(servings);
        }
        for name in &filter.include_ingredients {
            query
                .push(" AND EXISTS (")
                .push(HAS_INGREDIENT)
                .push_bind(name.clone())
                .push("))");
        }
        for name in &filter.exclude_ingredients {
            query
                .push(" AND NOT EXISTS (")
                .push(HAS_INGREDIENT)
                .push_bind(name.clone())
                .push("))");
        }
        if let Some(text) = &filter.instruction_text {
            query
                .push(" AND STRPOS(LOWER(r.instructions), LOWER(")
                .push_bind(text.clone())
                .push(")) > 0");
        }

        query
            .push(" ORDER BY LOWER(r.name), r.id LIMIT ")
            .push_bind(i64::from(page.size()))
            .push(" OFFSET ")
            .push_bind(to_bigint(page.offset())?);

        let rows: Vec<RecipeRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        self.hydrate(rows).await
    }

    async fn save(&self, recipe: &Recipe) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            "INSERT INTO recipes \
             (id, name, recipe_type, number_of_servings, instructions, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET \
             name = EXCLUDED.name, \
             recipe_type = EXCLUDED.recipe_type, \
             number_of_servings = EXCLUDED.number_of_servings, \
             instructions = EXCLUDED.instructions, \
             updated_at = EXCLUDED.updated_at",
        )
        .bind(recipe.id)
        .bind(&recipe.name)
        .bind(recipe.recipe_type.as_str())
        .bind(recipe.number_of_servings)
        .bind(&recipe.instructions)
        .bind(recipe.created_at)
        .bind(recipe.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe.id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let ingredient_ids: Vec<Uuid> = recipe.ingredients.iter().map(|i| i.id).collect();
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id) \
             SELECT $1, UNNEST($2::uuid[])",
        )
        .bind(recipe.id)
        .bind(&ingredient_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        tracing::debug!(
            recipe_id = %recipe.id,
            ingredient_count = ingredient_ids.len(),
            "recipe rows written"
        );
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
