//! PostgreSQL-backed repositories for the recipe service.

mod error;
pub mod pg_ingredient_repository;
pub mod pg_recipe_repository;

/// Embedded schema migrations, applied at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
