//! Integration tests for the catalog endpoints against `PostgreSQL`.

mod common;

use axum::http::StatusCode;
use recipe_core::validation::messages;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_ingredient_lifecycle(pool: PgPool) {
    // Arrange
    let (status, created) = common::post_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/ingredients",
        &json!({ "name": "Garlic" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_owned();

    // Act
    let (found_status, found) = common::get_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/ingredients/search?name=GARLIC",
    )
    .await;
    let (deleted_status, _) = common::delete(
        common::build_pg_app(pool.clone()),
        &format!("/api/v1/ingredients/{id}"),
    )
    .await;
    let (gone_status, _) = common::get_json(
        common::build_pg_app(pool),
        &format!("/api/v1/ingredients/{id}"),
    )
    .await;

    // Assert
    assert_eq!(found_status, StatusCode::OK);
    assert_eq!(found["id"], id.as_str());
    assert_eq!(deleted_status, StatusCode::NO_CONTENT);
    assert_eq!(gone_status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_recipe_lifecycle_and_referenced_ingredient(pool: PgPool) {
    // Arrange
    let (_, onion) = common::post_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/ingredients",
        &json!({ "name": "Onion" }),
    )
    .await;
    let onion_id = onion["id"].as_str().unwrap().to_owned();

    let (status, recipe) = common::post_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/recipes",
        &json!({
            "name": "Onion Soup",
            "recipe_type": "VEGETARIAN",
            "number_of_servings": 4,
            "instructions": "Caramelise the onions slowly",
            "ingredient_ids": [onion_id],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let recipe_id = recipe["id"].as_str().unwrap().to_owned();

    // Act
    let (search_status, results) = common::post_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/recipes/search",
        &json!({ "include_ingredients": ["onion"], "instruction_text": "CARAMELISE" }),
    )
    .await;
    let (blocked_status, blocked) = common::delete(
        common::build_pg_app(pool.clone()),
        &format!("/api/v1/ingredients/{onion_id}"),
    )
    .await;
    let (recipe_deleted, _) = common::delete(
        common::build_pg_app(pool.clone()),
        &format!("/api/v1/recipes/{recipe_id}"),
    )
    .await;
    let (ingredient_deleted, _) = common::delete(
        common::build_pg_app(pool),
        &format!("/api/v1/ingredients/{onion_id}"),
    )
    .await;

    // Assert
    assert_eq!(search_status, StatusCode::OK);
    assert_eq!(results[0]["id"], recipe_id.as_str());
    assert_eq!(blocked_status, StatusCode::FORBIDDEN);
    assert_eq!(blocked["message"], messages::DB_CONSTRAINT_VIOLATED);
    assert_eq!(recipe_deleted, StatusCode::NO_CONTENT);
    assert_eq!(ingredient_deleted, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_recipe_name_is_rejected(pool: PgPool) {
    let (_, leek) = common::post_json(
        common::build_pg_app(pool.clone()),
        "/api/v1/ingredients",
        &json!({ "name": "Leek" }),
    )
    .await;
    let body = json!({
        "name": "Leek Pie",
        "recipe_type": "OTHER",
        "number_of_servings": 6,
        "instructions": "Bake",
        "ingredient_ids": [leek["id"]],
    });
    common::post_json(common::build_pg_app(pool.clone()), "/api/v1/recipes", &body).await;

    let mut renamed = body.clone();
    renamed["name"] = json!("LEEK PIE");
    let (status, json) =
        common::post_json(common::build_pg_app(pool), "/api/v1/recipes", &renamed).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "LEEK PIE already exists");
}
