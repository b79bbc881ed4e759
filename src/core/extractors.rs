//! Axum extractors for the caller's identity and path ids
//!
//! - [`AuthContext`] resolves `Authorization: Bearer <token>` through the
//!   [`Authenticator`] held in application state
//! - [`PathId`] parses a single UUID path segment

use crate::core::auth::AuthContext;
use crate::core::authenticator::Authenticator;
use crate::core::error::{AuthError, HubError, ValidationError};
use axum::extract::{FromRef, FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

/// Token carried by the request, if any.
///
/// `Ok(None)` when there is no `Authorization: Bearer` header at all; a bearer
/// header with an empty token is an error.
pub fn bearer_token(parts: &Parts) -> Result<Option<&str>, AuthError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?.trim();
    if value == "Bearer" {
        return Err(AuthError::InvalidToken);
    }
    match value.strip_prefix("Bearer ") {
        Some(rest) => {
            let token = rest.trim();
            if token.is_empty() {
                Err(AuthError::InvalidToken)
            } else {
                Ok(Some(token))
            }
        }
        None => Ok(None),
    }
}

/// No header yields `Anonymous`; a header that does not verify is rejected
/// with 401 rather than silently downgraded.
impl<S> FromRequestParts<S> for AuthContext
where
    Authenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = HubError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts)? else {
            return Ok(AuthContext::Anonymous);
        };
        let authenticator = Authenticator::from_ref(state);
        let identity = authenticator.resolve(token).await?;
        Ok(AuthContext::Authenticated(identity))
    }
}

/// A UUID taken from the single path parameter of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub Uuid);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = HubError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ValidationError::InvalidId {
                value: e.body_text(),
            })?;
        Uuid::parse_str(&raw)
            .map(PathId)
            .map_err(|_| ValidationError::InvalidId { value: raw }.into())
    }
}
