//! Middleware that reports server failures.

use std::any::Any;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::{ApiError, ServerErrorCause};

/// Logs the original failure behind every 500 response. The response itself
/// passes through unchanged.
pub async fn record_server_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if let Some(cause) = response.extensions().get::<ServerErrorCause>() {
        error!(
            %method,
            %uri,
            kind = cause.kind,
            detail = %cause.detail,
            "request failed with a server error"
        );
    }
    response
}

/// Turns a caught handler panic into a classified 500 response.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else {
        "unknown panic payload".to_owned()
    };
    ApiError::Panic(detail).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Router, middleware};
    use recipe_core::error::DomainError;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::*;

    async fn failing_handler() -> Result<(), ApiError> {
        Err(DomainError::Infrastructure("pool timed out".into()).into())
    }

    async fn panicking_handler() -> &'static str {
        panic!("boom")
    }

    fn app() -> Router {
        Router::new()
            .route("/fail", get(failing_handler))
            .route("/panic", get(panicking_handler))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn(record_server_errors))
    }

    async fn send_get(uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_server_error_passes_through_with_cause() {
        let response = send_get("/fail").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let cause = response.extensions().get::<ServerErrorCause>().unwrap();
        assert_eq!(cause.detail, "pool timed out");
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error_payload() {
        let response = send_get("/panic").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let cause = response.extensions().get::<ServerErrorCause>().unwrap();
        assert_eq!(cause.kind, "panic");
        assert_eq!(cause.detail, "handler panicked: boom");

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["severity"], "ERROR");
    }
}
