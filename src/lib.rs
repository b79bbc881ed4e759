//! # learnhub
//!
//! A learning-resource sharing API: accounts, resources, likes, ratings,
//! bookmarks and admin moderation over a JSON/HTTP interface.
//!
//! ## Layout
//!
//! - [`core`]: domain types, validation, authorization, services and store traits
//! - [`storage`]: in-memory and MongoDB store implementations
//! - [`server`]: axum routes, handlers and the [`ServerBuilder`](server::ServerBuilder)
//! - [`config`]: YAML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use learnhub::prelude::*;
//!
//! let config = AppConfig::default().apply_env()?;
//! ServerBuilder::new()
//!     .with_config(config)
//!     .with_stores(Stores::in_memory())
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        AuthContext, AuthPolicy, AuthSession, Authenticator, Category, HubError, HubResult,
        Identity, ListParams, PageRequest, PaginationMeta, PublicUser, Rating, RatingValue,
        Resource, ResourceFilter, ResourceQuery, ResourceService, ResourceStore, ResourceView,
        Role, SortOrder, TokenSigner, User, UserService, UserStore,
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoStore;
    pub use crate::storage::Stores;

    // === Config ===
    pub use crate::config::{AppConfig, AuthConfig, ServerConfig, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::{ApiResponse, AppState, ServerBuilder, build_router};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
