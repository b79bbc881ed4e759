//! ServerBuilder for fluent API to build HTTP servers

use super::host::AppState;
use super::router::build_router;
use crate::config::AppConfig;
use crate::storage::{self, Stores};
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

/// Builder for creating the HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(config)
///     .with_stores(Stores::in_memory())
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    stores: Option<Stores>,
    custom_routes: Vec<Router<AppState>>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            stores: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Use these stores instead of connecting to the configured backend
    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Add custom routes to the server
    ///
    /// Routes are merged at the top level, outside the API prefix, and share
    /// the application state.
    pub fn with_custom_routes(mut self, routes: Router<AppState>) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Validate the configuration and wire services to the stores.
    ///
    /// Connects to the configured backend unless stores were supplied.
    pub async fn build_state(&mut self) -> Result<AppState> {
        self.config.validate()?;
        if self.config.auth.uses_default_secret() {
            tracing::warn!("JWT_SECRET is not set; using the insecure development secret");
        }

        let stores = match self.stores.take() {
            Some(stores) => stores,
            None => storage::connect(&self.config.storage).await?,
        };
        Ok(AppState::new(self.config.clone(), stores))
    }

    /// Build the final router
    pub async fn build(mut self) -> Result<Router> {
        let state = self.build_state().await?;
        build_router(state, std::mem::take(&mut self.custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the configured host and port
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind_address();
        let prefix = self.config.server.api_prefix.clone();
        let app = self.build().await?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {} (API under {})", addr, prefix);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
