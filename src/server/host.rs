//! Application state shared by every handler
//!
//! The state is transport-agnostic: it owns the configuration and the
//! services, and nothing in it depends on axum beyond the `FromRef` impls used
//! by extractors.

use crate::config::AppConfig;
use crate::core::authenticator::Authenticator;
use crate::core::service::{ResourceService, UserService};
use crate::core::token::TokenSigner;
use crate::storage::Stores;
use axum::extract::FromRef;
use std::sync::Arc;

/// Cheap to clone; every field is reference counted internally
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub authenticator: Authenticator,
    pub resources: ResourceService,
    pub users: UserService,
}

impl AppState {
    /// Wire services to the given stores
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let state = AppState::new(AppConfig::default(), Stores::in_memory());
    /// let app = build_router(state, Vec::new());
    /// ```
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let signer = TokenSigner::new(&config.auth.jwt_secret, config.auth.token_ttl_days);
        Self {
            authenticator: Authenticator::new(stores.users.clone(), signer),
            resources: ResourceService::new(stores.resources.clone(), stores.users.clone()),
            users: UserService::new(stores.users, stores.resources),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Authenticator {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}
