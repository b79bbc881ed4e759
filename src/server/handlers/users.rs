//! `/users` routes

use crate::core::auth::AuthContext;
use crate::core::error::HubResult;
use crate::core::extractors::PathId;
use crate::server::host::AppState;
use crate::server::response::ApiResponse;
use axum::extract::State;
use serde_json::{Value, json};

/// `GET /users` (admin)
pub async fn list_users(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> HubResult<ApiResponse<Value>> {
    let users = state.users.list_all(&ctx).await?;
    Ok(ApiResponse::ok(json!({ "users": users })).with_count(users.len()))
}

/// `PUT /users/bookmark/{resource_id}`
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    ctx: AuthContext,
    PathId(resource_id): PathId,
) -> HubResult<ApiResponse<Value>> {
    let toggle = state.users.toggle_bookmark(&ctx, resource_id).await?;
    let message = if toggle.bookmarked {
        "Resource bookmarked"
    } else {
        "Bookmark removed"
    };
    Ok(ApiResponse::ok(json!({
        "bookmarks": toggle.bookmarks,
        "bookmarked": toggle.bookmarked,
    }))
    .with_message(message))
}

/// `GET /users/bookmarks`
pub async fn list_bookmarks(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> HubResult<ApiResponse<Value>> {
    let bookmarks = state.users.bookmarks(&ctx).await?;
    Ok(ApiResponse::ok(json!({ "bookmarks": bookmarks })).with_count(bookmarks.len()))
}
