//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use recipe_api::state::AppState;
use recipe_store::pg_ingredient_repository::PgIngredientRepository;
use recipe_store::pg_recipe_repository::PgRecipeRepository;
use recipe_test_support::{FailingRepository, FixedClock, InMemoryCatalog};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build the full app router over an in-memory catalog.
pub fn build_test_app(catalog: &Arc<InMemoryCatalog>) -> Router {
    recipe_api::app(AppState::new(
        Arc::new(FixedClock::default()),
        catalog.clone(),
        catalog.clone(),
    ))
}

/// Build the full app router over repositories that always fail.
pub fn build_failing_app() -> Router {
    recipe_api::app(AppState::new(
        Arc::new(FixedClock::default()),
        Arc::new(FailingRepository),
        Arc::new(FailingRepository),
    ))
}

/// Build the full app router over the `PostgreSQL` repositories.
pub fn build_pg_app(pool: PgPool) -> Router {
    recipe_api::app(AppState::new(
        Arc::new(FixedClock::default()),
        Arc::new(PgIngredientRepository::new(pool.clone())),
        Arc::new(PgRecipeRepository::new(pool)),
    ))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a request with a JSON body and return the response.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response. An empty body is `Null`.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
