//! Recipe service — API error types and the error classifier.
//!
//! Every failure that leaves a request handler is an [`ApiError`]. Its
//! `IntoResponse` implementation is the single place where failures are
//! turned into an HTTP status and one of two JSON payload shapes.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use recipe_core::error::DomainError;
use recipe_core::validation::{FieldErrors, messages};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Status used for the not-found variants when no status was preferred.
const NOT_FOUND_DEFAULT_STATUS: StatusCode = StatusCode::NOT_FOUND;

/// Status used for the duplicate variants when no status was preferred.
///
/// Kept at 404 to match the service's published behaviour; see DESIGN.md.
const DUPLICATE_DEFAULT_STATUS: StatusCode = StatusCode::NOT_FOUND;

/// Client-facing message for a panicked handler.
const PANIC_MESSAGE: &str = "unexpected failure while handling the request";

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Tracing or exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Application-level error code carried in every error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request was malformed or referred to something unusable.
    InvalidInput,
    /// The store rejected the operation.
    DbError,
    /// An unclassified runtime failure.
    InternalError,
    /// Anything the classifier has no specific rule for.
    GlobalError,
}

/// How serious an error is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityLevel {
    Error,
    Warning,
    Info,
}

/// Single-message error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub message: String,
    pub code: ErrorCode,
    pub severity: SeverityLevel,
}

impl ErrorPayload {
    /// An absent message renders as the empty string.
    #[must_use]
    pub fn new(message: Option<&str>, code: ErrorCode, severity: SeverityLevel) -> Self {
        Self {
            message: message.unwrap_or_default().to_owned(),
            code,
            severity,
        }
    }
}

/// Field-to-message error payload for rejected request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorPayload {
    pub field_errors: FieldErrors,
    pub code: ErrorCode,
    pub severity: SeverityLevel,
}

impl ValidationErrorPayload {
    #[must_use]
    pub fn new(field_errors: FieldErrors, code: ErrorCode, severity: SeverityLevel) -> Self {
        Self {
            field_errors,
            code,
            severity,
        }
    }
}

/// JSON body returned for error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Single(ErrorPayload),
    Fields(ValidationErrorPayload),
}

/// Attached to the extensions of every 500 response so that outer
/// middleware can report the original failure. Never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerErrorCause {
    /// Stable name of the failure kind.
    pub kind: &'static str,
    /// Full description of the failure.
    pub detail: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A failure raised by the catalog or the store.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// One or more request fields failed validation.
    #[error("request validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// The request could not be parsed into the expected shape.
    #[error("{0}")]
    MalformedArgument(String),

    /// A handler panicked.
    #[error("handler panicked: {0}")]
    Panic(String),

    /// A failure with no more specific classification.
    #[error("{0}")]
    Unhandled(String),
}

fn single(message: Option<&str>, code: ErrorCode) -> ErrorBody {
    ErrorBody::Single(ErrorPayload::new(message, code, SeverityLevel::Error))
}

impl ApiError {
    /// Stable name of the failure kind for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Validation(_) => "validation",
            Self::MalformedArgument(_) => "malformed_argument",
            Self::Panic(_) => "panic",
            Self::Unhandled(_) => "unhandled",
        }
    }

    /// Maps the failure to its HTTP status and payload. Never fails.
    #[must_use]
    pub fn classify(&self) -> (StatusCode, ErrorBody) {
        match self {
            Self::Validation(field_errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::Fields(ValidationErrorPayload::new(
                    field_errors.clone(),
                    ErrorCode::InvalidInput,
                    SeverityLevel::Error,
                )),
            ),
            Self::Domain(DomainError::RecipeNotFound(failure)) => (
                failure.status().unwrap_or(NOT_FOUND_DEFAULT_STATUS),
                single(failure.message(), ErrorCode::InvalidInput),
            ),
            Self::Domain(DomainError::RecipeDuplicate(failure)) => (
                failure.status().unwrap_or(DUPLICATE_DEFAULT_STATUS),
                single(failure.message(), ErrorCode::InvalidInput),
            ),
            Self::Domain(DomainError::IngredientDuplicate(failure)) => (
                failure.status().unwrap_or(DUPLICATE_DEFAULT_STATUS),
                single(failure.message(), ErrorCode::InvalidInput),
            ),
            Self::Domain(DomainError::IngredientNotFound(failure)) => (
                failure.status().unwrap_or(NOT_FOUND_DEFAULT_STATUS),
                single(failure.message(), ErrorCode::InvalidInput),
            ),
            Self::Domain(DomainError::InvalidArgument(message)) | Self::MalformedArgument(message) => (
                StatusCode::BAD_REQUEST,
                single(Some(message.as_str()), ErrorCode::InvalidInput),
            ),
            Self::Domain(DomainError::DataIntegrity {
                message,
                caused_by_constraint,
                ..
            }) => {
                // Storage constraint names and raw driver text stay server-side.
                let message = if *caused_by_constraint {
                    messages::DB_CONSTRAINT_VIOLATED
                } else {
                    message.as_str()
                };
                (StatusCode::FORBIDDEN, single(Some(message), ErrorCode::DbError))
            }
            Self::Domain(DomainError::ConstraintViolation(message)) => (
                StatusCode::BAD_REQUEST,
                single(Some(message.as_str()), ErrorCode::DbError),
            ),
            Self::Domain(DomainError::Infrastructure(message)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                single(Some(message.as_str()), ErrorCode::InternalError),
            ),
            Self::Panic(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                single(Some(PANIC_MESSAGE), ErrorCode::InternalError),
            ),
            Self::Unhandled(message) => (
                StatusCode::BAD_REQUEST,
                single(Some(message.as_str()), ErrorCode::GlobalError),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.classify();

        if !status.is_server_error() {
            warn!(
                status = status.as_u16(),
                kind = self.kind(),
                error = %self,
                "request rejected"
            );
        }

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            response.extensions_mut().insert(ServerErrorCause {
                kind: self.kind(),
                detail: self.to_string(),
            });
        }
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                Self::MalformedArgument(rejection.body_text())
            }
            _ => Self::Unhandled(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::MalformedArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::MalformedArgument(rejection.body_text())
    }
}
