//! HTTP server: application state, routes, handlers and the builder that
//! wires them to a storage backend

pub mod builder;
pub mod handlers;
pub mod host;
pub mod response;
pub mod router;

pub use builder::ServerBuilder;
pub use host::AppState;
pub use response::ApiResponse;
pub use router::{build_api_routes, build_router};
