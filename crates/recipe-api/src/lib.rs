//! Recipe service — HTTP API.

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

use crate::state::AppState;

/// Builds the full application router with its error-reporting layers.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/ingredients", routes::ingredients::router())
        .nest("/api/v1/recipes", routes::recipes::router())
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(axum::middleware::from_fn(middleware::record_server_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
