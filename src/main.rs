use anyhow::Result;
use learnhub::config::AppConfig;
use learnhub::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("learnhub=info,tower_http=info")),
        )
        .init();

    let config = match std::env::var("LEARNHUB_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::from_yaml_file(&path)?
        }
        Err(_) => AppConfig::default(),
    }
    .apply_env()?;

    tracing::info!(
        backend = ?config.storage.backend,
        port = config.server.port,
        "starting learnhub"
    );

    ServerBuilder::new().with_config(config).serve().await
}
