//! `/auth` routes

use crate::core::auth::AuthContext;
use crate::core::authenticator::AuthSession;
use crate::core::error::HubResult;
use crate::core::validation::{JsonBody, LoginInput, RegisterInput};
use crate::server::host::AppState;
use crate::server::response::ApiResponse;
use axum::extract::State;
use serde_json::{Value, json};

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> HubResult<ApiResponse<AuthSession>> {
    let session = state.authenticator.register(input).await?;
    Ok(ApiResponse::created(session).with_message("User registered successfully"))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginInput>,
) -> HubResult<ApiResponse<AuthSession>> {
    let session = state.authenticator.login(input).await?;
    Ok(ApiResponse::ok(session).with_message("Login successful"))
}

/// `GET /auth/me`
pub async fn me(State(state): State<AppState>, ctx: AuthContext) -> HubResult<ApiResponse<Value>> {
    let user = state.users.me(&ctx).await?;
    Ok(ApiResponse::ok(json!({ "user": user })))
}
