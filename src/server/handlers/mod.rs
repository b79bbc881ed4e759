//! HTTP handlers
//!
//! Handlers only unpack the request, call one service method and wrap the
//! result in an [`ApiResponse`](super::response::ApiResponse). Every error is
//! a [`HubError`](crate::core::error::HubError) and renders itself.

pub mod auth;
pub mod resources;
pub mod users;
