//! Domain error types.

use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// Boxed error used as the cause of a [`Failure`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Classification data carried by the not-found and duplicate variants of
/// [`DomainError`].
///
/// Every field is optional. A missing message renders as an empty string and
/// a missing status means the HTTP layer applies its default for the variant.
#[derive(Debug, Default)]
pub struct Failure {
    message: Option<String>,
    status: Option<StatusCode>,
    source: Option<BoxError>,
}

impl Failure {
    /// Creates a failure with no message, status or cause.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a failure carrying only a message.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Creates a failure carrying a message and the error that caused it.
    #[must_use]
    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: Some(message.into()),
            status: None,
            source: Some(cause.into()),
        }
    }

    /// Creates a failure from a cause alone. The cause's display text becomes
    /// the message.
    #[must_use]
    pub fn from_cause(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            message: Some(cause.to_string()),
            status: None,
            source: Some(cause),
        }
    }

    /// Creates a failure carrying a message and a preferred HTTP status.
    #[must_use]
    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: Some(message.into()),
            status: Some(status),
            source: None,
        }
    }

    /// The human-readable message, if one was given.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The preferred HTTP status, if one was given.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or_default())
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No recipe matched the lookup.
    #[error("{0}")]
    RecipeNotFound(Failure),

    /// A recipe with the same name already exists.
    #[error("{0}")]
    RecipeDuplicate(Failure),

    /// No ingredient matched the lookup.
    #[error("{0}")]
    IngredientNotFound(Failure),

    /// An ingredient with the same name already exists.
    #[error("{0}")]
    IngredientDuplicate(Failure),

    /// A caller supplied an argument the operation cannot accept.
    #[error("{0}")]
    InvalidArgument(String),

    /// The store rejected a write that would break data integrity.
    #[error("{message}")]
    DataIntegrity {
        /// Raw message reported by the store.
        message: String,
        /// Name of the violated storage constraint, when the store reported one.
        /// Not-null violations carry none.
        constraint: Option<String>,
        /// Whether a storage constraint rejected the write (unique, foreign
        /// key, not-null or check).
        caused_by_constraint: bool,
    },

    /// A domain invariant was violated before reaching the store.
    #[error("{0}")]
    ConstraintViolation(String),

    /// An infrastructure/persistence failure with no finer classification.
    #[error("{0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Short, stable name of the variant for structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound(_) => "recipe_not_found",
            Self::RecipeDuplicate(_) => "recipe_duplicate",
            Self::IngredientNotFound(_) => "ingredient_not_found",
            Self::IngredientDuplicate(_) => "ingredient_duplicate",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::DataIntegrity { .. } => "data_integrity",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::Infrastructure(_) => "infrastructure",
        }
    }
}
