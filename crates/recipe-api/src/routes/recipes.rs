//! Routes for recipes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use recipe_catalog::application::command_handlers;
use recipe_catalog::application::query_handlers::{self, RecipeView};
use recipe_catalog::domain::commands;
use recipe_core::model::{RecipeFilter, RecipeType};
use recipe_core::validation::{
    FieldErrors, MAX_LENGTH_INSTRUCTIONS, MAX_SERVINGS, RECIPE_NAME, Validate, check_name,
    check_not_empty, check_present, check_range, check_text, messages,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{AppPath, AppQuery, ValidatedJson};
use crate::routes::PageParams;
use crate::state::AppState;

/// Request body for POST / and PUT /{recipe_id}.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a field error rather than a parse failure.
#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub name: Option<String>,
    pub recipe_type: Option<RecipeType>,
    pub number_of_servings: Option<i32>,
    pub instructions: Option<String>,
    pub ingredient_ids: Option<Vec<Uuid>>,
}

impl Validate for RecipeRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.add("name", check_name(self.name.as_deref(), &RECIPE_NAME));
        errors.add(
            "recipe_type",
            check_present(self.recipe_type.as_ref(), messages::RECIPE_TYPE_NOT_NULL),
        );
        errors.add(
            "number_of_servings",
            check_range(
                self.number_of_servings,
                1,
                MAX_SERVINGS,
                messages::RECIPE_SERVINGS_NOT_NULL,
                messages::RECIPE_SERVINGS_NOT_VALID,
            ),
        );
        errors.add(
            "instructions",
            check_text(
                self.instructions.as_deref(),
                MAX_LENGTH_INSTRUCTIONS,
                messages::RECIPE_INSTRUCTIONS_NOT_NULL,
                messages::RECIPE_INSTRUCTIONS_SIZE_NOT_VALID,
            ),
        );
        errors.add(
            "ingredient_ids",
            check_not_empty(
                self.ingredient_ids.as_deref(),
                messages::RECIPE_INGREDIENTS_NOT_EMPTY,
            ),
        );
        errors.into_result()
    }
}

/// The fields of a validated [`RecipeRequest`].
struct RecipeFields {
    name: String,
    recipe_type: RecipeType,
    number_of_servings: i32,
    instructions: String,
    ingredient_ids: Vec<Uuid>,
}

impl RecipeRequest {
    fn into_fields(self) -> Result<RecipeFields, ApiError> {
        match (
            self.name,
            self.recipe_type,
            self.number_of_servings,
            self.instructions,
            self.ingredient_ids,
        ) {
            (
                Some(name),
                Some(recipe_type),
                Some(number_of_servings),
                Some(instructions),
                Some(ingredient_ids),
            ) => Ok(RecipeFields {
                name,
                recipe_type,
                number_of_servings,
                instructions,
                ingredient_ids,
            }),
            _ => Err(ApiError::MalformedArgument(
                "recipe request is missing a field".into(),
            )),
        }
    }
}

/// Request body for POST /search. Absent criteria are not applied.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeSearchRequest {
    pub recipe_type: Option<RecipeType>,
    pub number_of_servings: Option<i32>,
    #[serde(default)]
    pub include_ingredients: Vec<String>,
    #[serde(default)]
    pub exclude_ingredients: Vec<String>,
    pub instruction_text: Option<String>,
}

impl Validate for RecipeSearchRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.number_of_servings.is_some() {
            errors.add(
                "number_of_servings",
                check_range(
                    self.number_of_servings,
                    1,
                    MAX_SERVINGS,
                    messages::RECIPE_SERVINGS_NOT_NULL,
                    messages::RECIPE_SERVINGS_NOT_VALID,
                ),
            );
        }
        errors.into_result()
    }
}

impl From<RecipeSearchRequest> for RecipeFilter {
    fn from(request: RecipeSearchRequest) -> Self {
        Self {
            recipe_type: request.recipe_type,
            number_of_servings: request.number_of_servings,
            include_ingredients: request.include_ingredients,
            exclude_ingredients: request.exclude_ingredients,
            instruction_text: request.instruction_text,
        }
    }
}

/// GET /
#[instrument(skip(state), fields(page = params.page, size = params.size))]
async fn list_recipes(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<Vec<RecipeView>>, ApiError> {
    let views = query_handlers::list_recipes(params.to_page()?, &*state.recipe_repository).await?;
    Ok(Json(views))
}

/// POST /
#[instrument(skip(state, request))]
async fn create_recipe(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeView>), ApiError> {
    let fields = request.into_fields()?;
    let command = commands::CreateRecipe {
        correlation_id: Uuid::new_v4(),
        name: fields.name,
        recipe_type: fields.recipe_type,
        number_of_servings: fields.number_of_servings,
        instructions: fields.instructions,
        ingredient_ids: fields.ingredient_ids,
    };

    info!(correlation_id = %command.correlation_id, "handling create_recipe command");

    let recipe = command_handlers::handle_create_recipe(
        &command,
        state.clock.as_ref(),
        &*state.ingredient_repository,
        &*state.recipe_repository,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(recipe.into())))
}

/// POST /search
#[instrument(skip(state, request), fields(page = params.page, size = params.size))]
async fn search_recipes(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageParams>,
    ValidatedJson(request): ValidatedJson<RecipeSearchRequest>,
) -> Result<Json<Vec<RecipeView>>, ApiError> {
    let filter = RecipeFilter::from(request);
    let views =
        query_handlers::search_recipes(&filter, params.to_page()?, &*state.recipe_repository)
            .await?;
    Ok(Json(views))
}

/// GET /{recipe_id}
#[instrument(skip(state))]
async fn get_recipe(
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<Uuid>,
) -> Result<Json<RecipeView>, ApiError> {
    let view = query_handlers::get_recipe_by_id(recipe_id, &*state.recipe_repository).await?;
    Ok(Json(view))
}

/// PUT /{recipe_id}
#[instrument(skip(state, request))]
async fn update_recipe(
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<Uuid>,
    ValidatedJson(request): ValidatedJson<RecipeRequest>,
) -> Result<Json<RecipeView>, ApiError> {
    let fields = request.into_fields()?;
    let command = commands::UpdateRecipe {
        correlation_id: Uuid::new_v4(),
        recipe_id,
        name: fields.name,
        recipe_type: fields.recipe_type,
        number_of_servings: fields.number_of_servings,
        instructions: fields.instructions,
        ingredient_ids: fields.ingredient_ids,
    };

    info!(correlation_id = %command.correlation_id, "handling update_recipe command");

    let recipe = command_handlers::handle_update_recipe(
        &command,
        state.clock.as_ref(),
        &*state.ingredient_repository,
        &*state.recipe_repository,
    )
    .await?;

    Ok(Json(recipe.into()))
}

/// DELETE /{recipe_id}
#[instrument(skip(state))]
async fn delete_recipe(
    State(state): State<AppState>,
    AppPath(recipe_id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DeleteRecipe {
        correlation_id: Uuid::new_v4(),
        recipe_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_recipe command");

    command_handlers::handle_delete_recipe(&command, &*state.recipe_repository).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for recipes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/search", post(search_recipes))
        .route(
            "/{recipe_id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use recipe_core::model::Ingredient;
    use recipe_test_support::{FixedClock, InMemoryCatalog, fixed_time};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn ingredient(name: &str) -> Ingredient {
        Ingredient {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            created_at: fixed_time(),
        }
    }

    fn app_with(catalog: &Arc<InMemoryCatalog>) -> Router {
        let state = AppState::new(
            Arc::new(FixedClock::default()),
            catalog.clone(),
            catalog.clone(),
        );
        router().with_state(state)
    }

    async fn send_json(app: Router, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    fn recipe_body(name: &str, ingredient_ids: &[Uuid]) -> Value {
        json!({
            "name": name,
            "recipe_type": "VEGETARIAN",
            "number_of_servings": 4,
            "instructions": "Bake in the oven",
            "ingredient_ids": ingredient_ids,
        })
    }

    #[tokio::test]
    async fn test_create_recipe_returns_201_with_ingredients() {
        // Arrange
        let potato = ingredient("Potato");
        let catalog = Arc::new(InMemoryCatalog::with_ingredients(vec![potato.clone()]));

        // Act
        let (status, json) = send_json(
            app_with(&catalog),
            "POST",
            "/",
            &recipe_body("Baked Potato", &[potato.id]),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["name"], "Baked Potato");
        assert_eq!(json["recipe_type"], "VEGETARIAN");
        assert_eq!(json["ingredients"][0]["name"], "Potato");
        assert_eq!(catalog.recipes().len(), 1);
    }

    #[tokio::test]
    async fn test_create_recipe_reports_every_invalid_field() {
        // Arrange
        let catalog = Arc::new(InMemoryCatalog::new());
        let body = json!({
            "name": "   ",
            "number_of_servings": 0,
            "instructions": "",
            "ingredient_ids": [],
        });

        // Act
        let (status, json) = send_json(app_with(&catalog), "POST", "/", &body).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert_eq!(
            json["fieldErrors"],
            json!({
                "name": messages::RECIPE_NAME_NOT_NULL,
                "recipe_type": messages::RECIPE_TYPE_NOT_NULL,
                "number_of_servings": messages::RECIPE_SERVINGS_NOT_VALID,
                "instructions": messages::RECIPE_INSTRUCTIONS_NOT_NULL,
                "ingredient_ids": messages::RECIPE_INGREDIENTS_NOT_EMPTY,
            })
        );
    }

    #[tokio::test]
    async fn test_create_recipe_with_unknown_type_is_malformed() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let mut body = recipe_body("Soup", &[Uuid::new_v4()]);
        body["recipe_type"] = json!("VEGAN");

        let (status, json) = send_json(app_with(&catalog), "POST", "/", &body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_INPUT");
        assert!(json.get("fieldErrors").is_none());
    }

    #[tokio::test]
    async fn test_create_recipe_with_repeated_ingredient_returns_db_error() {
        let potato = ingredient("Potato");
        let catalog = Arc::new(InMemoryCatalog::with_ingredients(vec![potato.clone()]));

        let (status, json) = send_json(
            app_with(&catalog),
            "POST",
            "/",
            &recipe_body("Mash", &[potato.id, potato.id]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "DB_ERROR");
    }

    #[tokio::test]
    async fn test_create_recipe_with_unknown_ingredient_returns_404() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let missing = Uuid::new_v4();

        let (status, json) = send_json(
            app_with(&catalog),
            "POST",
            "/",
            &recipe_body("Mash", &[missing]),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], format!("Ingredient {missing} not found"));
    }

    #[tokio::test]
    async fn test_update_missing_recipe_returns_404() {
        let potato = ingredient("Potato");
        let catalog = Arc::new(InMemoryCatalog::with_ingredients(vec![potato.clone()]));
        let recipe_id = Uuid::new_v4();

        let (status, json) = send_json(
            app_with(&catalog),
            "PUT",
            &format!("/{recipe_id}"),
            &recipe_body("Mash", &[potato.id]),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], format!("Recipe {recipe_id} not found"));
    }

    #[tokio::test]
    async fn test_update_recipe_replaces_fields() {
        // Arrange
        let potato = ingredient("Potato");
        let leek = ingredient("Leek");
        let catalog = Arc::new(InMemoryCatalog::with_ingredients(vec![
            potato.clone(),
            leek.clone(),
        ]));
        let (_, created) = send_json(
            app_with(&catalog),
            "POST",
            "/",
            &recipe_body("Soup", &[potato.id]),
        )
        .await;
        let recipe_id = created["id"].as_str().unwrap().to_owned();

        // Act
        let (status, json) = send_json(
            app_with(&catalog),
            "PUT",
            &format!("/{recipe_id}"),
            &recipe_body("Leek Soup", &[potato.id, leek.id]),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], recipe_id.as_str());
        assert_eq!(json["name"], "Leek Soup");
        assert_eq!(json["ingredients"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_rejects_out_of_range_servings() {
        let catalog = Arc::new(InMemoryCatalog::new());

        let (status, json) = send_json(
            app_with(&catalog),
            "POST",
            "/search",
            &json!({ "number_of_servings": 1000 }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["fieldErrors"]["number_of_servings"],
            messages::RECIPE_SERVINGS_NOT_VALID
        );
    }

    #[tokio::test]
    async fn test_search_filters_by_excluded_ingredient() {
        // Arrange
        let potato = ingredient("Potato");
        let salmon = ingredient("Salmon");
        let catalog = Arc::new(InMemoryCatalog::with_ingredients(vec![
            potato.clone(),
            salmon.clone(),
        ]));
        send_json(
            app_with(&catalog),
            "POST",
            "/",
            &recipe_body("Baked Potato", &[potato.id]),
        )
        .await;
        send_json(
            app_with(&catalog),
            "POST",
            "/",
            &recipe_body("Salmon Bake", &[potato.id, salmon.id]),
        )
        .await;

        // Act
        let (status, json) = send_json(
            app_with(&catalog),
            "POST",
            "/search?page=0&size=10",
            &json!({ "exclude_ingredients": ["SALMON"] }),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Baked Potato"]);
    }
}
