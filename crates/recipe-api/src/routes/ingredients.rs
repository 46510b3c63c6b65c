//! Routes for ingredients.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use recipe_catalog::application::command_handlers;
use recipe_catalog::application::query_handlers::{self, IngredientView};
use recipe_catalog::domain::commands;
use recipe_core::validation::{FieldErrors, INGREDIENT_NAME, Validate, check_name};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{AppPath, AppQuery, ValidatedJson};
use crate::routes::PageParams;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    /// Display name of the new ingredient.
    pub name: Option<String>,
}

impl Validate for CreateIngredientRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.add("name", check_name(self.name.as_deref(), &INGREDIENT_NAME));
        errors.into_result()
    }
}

/// Query string of GET /search.
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

/// GET /
#[instrument(skip(state), fields(page = params.page, size = params.size))]
async fn list_ingredients(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<Vec<IngredientView>>, ApiError> {
    let views =
        query_handlers::list_ingredients(params.to_page()?, &*state.ingredient_repository).await?;
    Ok(Json(views))
}

/// POST /
#[instrument(skip(state, request))]
async fn create_ingredient(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<IngredientView>), ApiError> {
    let command = commands::CreateIngredient {
        correlation_id: Uuid::new_v4(),
        name: request.name.unwrap_or_default(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_ingredient command");

    let ingredient = command_handlers::handle_create_ingredient(
        &command,
        state.clock.as_ref(),
        &*state.ingredient_repository,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ingredient.into())))
}

/// GET /search?name=
#[instrument(skip(state, query), fields(name = %query.name))]
async fn find_ingredient_by_name(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<NameQuery>,
) -> Result<Json<IngredientView>, ApiError> {
    let view =
        query_handlers::find_ingredient_by_name(&query.name, &*state.ingredient_repository)
            .await?;
    Ok(Json(view))
}

/// GET /{ingredient_id}
#[instrument(skip(state))]
async fn get_ingredient(
    State(state): State<AppState>,
    AppPath(ingredient_id): AppPath<Uuid>,
) -> Result<Json<IngredientView>, ApiError> {
    let view =
        query_handlers::get_ingredient_by_id(ingredient_id, &*state.ingredient_repository).await?;
    Ok(Json(view))
}

/// DELETE /{ingredient_id}
#[instrument(skip(state))]
async fn delete_ingredient(
    State(state): State<AppState>,
    AppPath(ingredient_id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteIngredient {
        correlation_id: Uuid::new_v4(),
        ingredient_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_ingredient command");

    command_handlers::handle_delete_ingredient(&command, &*state.ingredient_repository).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for ingredients.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ingredients).post(create_ingredient))
        .route("/search", get(find_ingredient_by_name))
        .route(
            "/{ingredient_id}",
            get(get_ingredient).delete(delete_ingredient),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use recipe_core::model::Ingredient;
    use recipe_core::validation::messages;
    use recipe_test_support::{FailingRepository, FixedClock, InMemoryCatalog, fixed_time};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_with(catalog: Arc<InMemoryCatalog>) -> Router {
        let state = AppState::new(Arc::new(FixedClock::default()), catalog.clone(), catalog);
        router().with_state(state)
    }

    fn failing_app() -> Router {
        let state = AppState::new(
            Arc::new(FixedClock::default()),
            Arc::new(FailingRepository),
            Arc::new(FailingRepository),
        );
        router().with_state(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, json)
    }

    fn post(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_create_ingredient_returns_201_with_trimmed_name() {
        // Arrange
        let catalog = Arc::new(InMemoryCatalog::new());
        let app = app_with(catalog.clone());

        // Act
        let (status, json) = send(app, post(&serde_json::json!({ "name": " Sweet Potato " }))).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["name"], "Sweet Potato");
        Uuid::parse_str(json["id"].as_str().unwrap()).unwrap();
        assert_eq!(catalog.ingredients().len(), 1);
    }

    #[tokio::test]
    async fn test_create_ingredient_with_blank_name_returns_field_errors() {
        // Arrange
        let app = app_with(Arc::new(InMemoryCatalog::new()));

        // Act
        let (status, json) = send(app, post(&serde_json::json!({ "name": "" }))).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            serde_json::json!({
                "fieldErrors": { "name": messages::INGREDIENT_NAME_NOT_NULL },
                "code": "INVALID_INPUT",
                "severity": "ERROR"
            })
        );
    }

    #[tokio::test]
    async fn test_create_ingredient_with_long_name_reports_size() {
        let app = app_with(Arc::new(InMemoryCatalog::new()));
        let name = "a".repeat(101);

        let (status, json) = send(app, post(&serde_json::json!({ "name": name }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["fieldErrors"]["name"], messages::INGREDIENT_SIZE_NOT_VALID);
    }

    #[tokio::test]
    async fn test_create_ingredient_with_padded_maximum_name_is_accepted() {
        let app = app_with(Arc::new(InMemoryCatalog::new()));
        let name = "a".repeat(100);

        let (status, json) =
            send(app, post(&serde_json::json!({ "name": format!(" {name} ") }))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["name"], name);
    }

    #[tokio::test]
    async fn test_create_ingredient_with_digits_reports_pattern() {
        let app = app_with(Arc::new(InMemoryCatalog::new()));

        let (status, json) = send(app, post(&serde_json::json!({ "name": "Vitamin B12" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["fieldErrors"]["name"], messages::INGREDIENT_PATTERN_NOT_VALID);
    }

    #[tokio::test]
    async fn test_create_duplicate_ingredient_returns_404_by_default() {
        // Arrange
        let catalog = Arc::new(InMemoryCatalog::with_ingredients(vec![Ingredient {
            id: Uuid::new_v4(),
            name: "Potato".into(),
            created_at: fixed_time(),
        }]));
        let app = app_with(catalog);

        // Act
        let (status, json) = send(app, post(&serde_json::json!({ "name": "potato" }))).await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "potato already exists");
        assert_eq!(json["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_search_missing_ingredient_returns_404_with_name() {
        let app = app_with(Arc::new(InMemoryCatalog::new()));

        let (status, json) = send(app, get_request("/search?name=Potato")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Potato not found",
                "code": "INVALID_INPUT",
                "severity": "ERROR"
            })
        );
    }

    #[tokio::test]
    async fn test_get_ingredient_with_malformed_id_returns_400() {
        let app = app_with(Arc::new(InMemoryCatalog::new()));

        let (status, json) = send(app, get_request("/not-a-uuid")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_list_ingredients_with_oversized_page_returns_400() {
        let app = app_with(Arc::new(InMemoryCatalog::new()));

        let (status, json) = send(app, get_request("/?size=500")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_create_ingredient_without_content_type_returns_global_error() {
        let app = app_with(Arc::new(InMemoryCatalog::new()));
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"name":"Potato"}"#))
            .unwrap();

        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "GLOBAL_ERROR");
    }

    #[tokio::test]
    async fn test_delete_missing_ingredient_returns_404() {
        let app = app_with(Arc::new(InMemoryCatalog::new()));
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();

        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_list_ingredients_returns_500_when_repository_fails() {
        // Arrange
        let app = failing_app();

        // Act
        let (status, json) = send(app, get_request("/")).await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["message"], "connection refused");
    }
}
