//! Request extractors whose rejections are classified like every other
//! failure.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use recipe_core::validation::Validate;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Path parameters; a value that does not parse is a malformed argument.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Query parameters; a value that does not parse is a malformed argument.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// A JSON body that has been deserialized and then passed every field
/// rule of its [`Validate`] implementation.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(Self(value))
    }
}
