//! `PostgreSQL` implementation of the `IngredientRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use recipe_core::error::DomainError;
use recipe_core::model::{Ingredient, PageRequest};
use recipe_core::repository::IngredientRepository;

use crate::error::{map_sqlx_error, to_bigint};

#[derive(sqlx::FromRow)]
struct IngredientRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed ingredient repository.
#[derive(Debug, Clone)]
pub struct PgIngredientRepository {
    pool: PgPool,
}

impl PgIngredientRepository {
    /// Creates a new `PgIngredientRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngredientRepository for PgIngredientRepository {
    async fn find_by_name_ignore_case(
        &self,
        name: &str,
    ) -> Result<Option<Ingredient>, DomainError> {
        let row: Option<IngredientRow> = sqlx::query_as(
            "SELECT id, name, created_at FROM ingredients WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Ingredient::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ingredient>, DomainError> {
        let row: Option<IngredientRow> =
            sqlx::query_as("SELECT id, name, created_at FROM ingredients WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        Ok(row.map(Ingredient::from))
    }

    async fn find_all_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Ingredient>, DomainError> {
        let rows: Vec<IngredientRow> =
            sqlx::query_as("SELECT id, name, created_at FROM ingredients WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn find_all(&self, page: PageRequest) -> Result<Vec<Ingredient>, DomainError> {
        let rows: Vec<IngredientRow> = sqlx::query_as(
            "SELECT id, name, created_at FROM ingredients \
             ORDER BY LOWER(name), id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(page.size()))
        .bind(to_bigint(page.offset())?)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn save(&self, ingredient: &Ingredient) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO ingredients (id, name, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
        )
        .bind(ingredient.id)
        .bind(&ingredient.name)
        .bind(ingredient.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        tracing::debug!(ingredient_id = %ingredient.id, "ingredient row written");
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
