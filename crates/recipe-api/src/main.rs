//! Recipe service API server entry point.

use std::sync::Arc;

use recipe_api::config::AppConfig;
use recipe_api::error::AppError;
use recipe_api::state::AppState;
use recipe_api::telemetry;
use recipe_core::clock::SystemClock;
use recipe_store::MIGRATOR;
use recipe_store::pg_ingredient_repository::PgIngredientRepository;
use recipe_store::pg_recipe_repository::PgRecipeRepository;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let _telemetry = telemetry::init(&config)?;

    tracing::info!("Starting recipe API server");

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("database migrations applied");

    // Build application state.
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(PgIngredientRepository::new(pool.clone())),
        Arc::new(PgRecipeRepository::new(pool)),
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = recipe_api::app(app_state).layer(CorsLayer::permissive());

    // Start server.
    let addr = config.listen_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
