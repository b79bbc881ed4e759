//! `/resources` routes

use crate::core::auth::AuthContext;
use crate::core::error::HubResult;
use crate::core::extractors::PathId;
use crate::core::query::ListParams;
use crate::core::validation::{JsonBody, NewResourceInput, RateInput, ResourceUpdateInput};
use crate::server::host::AppState;
use crate::server::response::ApiResponse;
use axum::extract::{Query, State};
use serde_json::{Value, json};

/// `GET /resources?search=&category=&sort=&page=&limit=`
pub async fn list_resources(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> HubResult<ApiResponse<Value>> {
    let page = state.resources.list(params).await?;
    Ok(ApiResponse::ok(json!({ "resources": page.resources })).with_pagination(page.meta))
}

/// `GET /resources/{id}`
pub async fn get_resource(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> HubResult<ApiResponse<Value>> {
    let resource = state.resources.get(id).await?;
    Ok(ApiResponse::ok(json!({ "resource": resource })))
}

/// `POST /resources`
pub async fn create_resource(
    State(state): State<AppState>,
    ctx: AuthContext,
    JsonBody(input): JsonBody<NewResourceInput>,
) -> HubResult<ApiResponse<Value>> {
    let resource = state.resources.create(&ctx, input).await?;
    Ok(ApiResponse::created(json!({ "resource": resource }))
        .with_message("Resource created successfully"))
}

/// `PUT /resources/{id}`
pub async fn update_resource(
    State(state): State<AppState>,
    ctx: AuthContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<ResourceUpdateInput>,
) -> HubResult<ApiResponse<Value>> {
    let resource = state.resources.update(&ctx, id, input).await?;
    Ok(ApiResponse::ok(json!({ "resource": resource })).with_message("Resource updated successfully"))
}

/// `DELETE /resources/{id}`
pub async fn delete_resource(
    State(state): State<AppState>,
    ctx: AuthContext,
    PathId(id): PathId,
) -> HubResult<ApiResponse<()>> {
    state.resources.delete(&ctx, id).await?;
    Ok(ApiResponse::message("Resource deleted successfully"))
}

/// `PUT /resources/{id}/like`
pub async fn toggle_like(
    State(state): State<AppState>,
    ctx: AuthContext,
    PathId(id): PathId,
) -> HubResult<ApiResponse<Value>> {
    let (resource, liked) = state.resources.toggle_like(&ctx, id).await?;
    let message = if liked { "Resource liked" } else { "Resource unliked" };
    Ok(ApiResponse::ok(json!({ "resource": resource, "liked": liked })).with_message(message))
}

/// `POST /resources/{id}/rate`
pub async fn rate_resource(
    State(state): State<AppState>,
    ctx: AuthContext,
    PathId(id): PathId,
    JsonBody(input): JsonBody<RateInput>,
) -> HubResult<ApiResponse<Value>> {
    let resource = state.resources.rate(&ctx, id, input).await?;
    Ok(ApiResponse::ok(json!({ "resource": resource })).with_message("Resource rated successfully"))
}

/// `GET /resources/user/my-resources`
pub async fn my_resources(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> HubResult<ApiResponse<Value>> {
    let resources = state.resources.mine(&ctx).await?;
    Ok(ApiResponse::ok(json!({ "resources": resources })).with_count(resources.len()))
}
