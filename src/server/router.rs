//! Route table
//!
//! All API routes are nested under the configured prefix (`/api` by default):
//!
//! - `POST /auth/register`, `POST /auth/login`, `GET /auth/me`
//! - `GET|POST /resources`, `GET|PUT|DELETE /resources/{id}`
//! - `PUT /resources/{id}/like`, `POST /resources/{id}/rate`
//! - `GET /resources/user/my-resources`
//! - `GET /users`, `PUT /users/bookmark/{resource_id}`, `GET /users/bookmarks`
//!
//! `GET /` and `GET /health` sit outside the prefix.

use super::handlers::{auth, resources, users};
use super::host::AppState;
use crate::core::error::ErrorResponse;
use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// API routes, relative to the prefix
pub fn build_api_routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let resource_routes = Router::new()
        .route(
            "/",
            get(resources::list_resources).post(resources::create_resource),
        )
        .route("/user/my-resources", get(resources::my_resources))
        .route(
            "/{id}",
            get(resources::get_resource)
                .put(resources::update_resource)
                .delete(resources::delete_resource),
        )
        .route("/{id}/like", put(resources::toggle_like))
        .route("/{id}/rate", post(resources::rate_resource));

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/bookmarks", get(users::list_bookmarks))
        .route("/bookmark/{resource_id}", put(users::toggle_bookmark));

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/resources", resource_routes)
        .nest("/users", user_routes)
}

/// Full application: API under the prefix, banner and health routes, CORS and
/// request tracing
pub fn build_router(state: AppState, custom_routes: Vec<Router<AppState>>) -> Result<Router> {
    let prefix = state.config.server.api_prefix.trim_end_matches('/').to_string();
    let cors = cors_layer(&state.config.server.cors_origin)?;

    let app = Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check));
    // axum refuses to nest at the root
    let mut app = if prefix.is_empty() {
        app.merge(build_api_routes())
    } else {
        app.nest(&prefix, build_api_routes())
    };

    for custom in custom_routes {
        app = app.merge(custom);
    }

    Ok(app
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("invalid CORS origin '{}'", origin))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}

async fn banner() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Learning Resource Hub API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "learnhub"
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            message: "Route not found".to_string(),
            code: "NOT_FOUND".to_string(),
            details: None,
        }),
    )
}
