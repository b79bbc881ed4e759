//! Axum extractor for JSON request bodies
//!
//! `axum::Json` rejects malformed bodies with a plain-text response. `JsonBody`
//! turns those rejections into a [`HubError`] so every failure leaves the server
//! in the same envelope.

use crate::core::error::{HubError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON body extractor with enveloped rejections
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn login(JsonBody(input): JsonBody<LoginInput>) -> HubResult<...> {
///     // input is deserialized; field validation happens in the service
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = HubError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(HubError::Validation(ValidationError::InvalidJson {
                message: rejection.body_text(),
            })),
        }
    }
}
