//! Configuration loading and management
//!
//! Configuration is read from YAML (every key optional), then overlaid with
//! environment variables:
//!
//! | Variable          | Field                    |
//! |-------------------|--------------------------|
//! | `PORT`            | `server.port`            |
//! | `CORS_ORIGIN`     | `server.cors_origin`     |
//! | `JWT_SECRET`      | `auth.jwt_secret`        |
//! | `STORAGE_BACKEND` | `storage.backend`        |
//! | `MONGO_URI`       | `storage.mongo_uri`      |

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_JWT_SECRET: &str = "devsecret";

/// Longest accepted token lifetime (about ten years)
pub const MAX_TOKEN_TTL_DAYS: u32 = 3650;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix every API route is nested under
    pub api_prefix: String,
    /// Single origin allowed by CORS
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            api_prefix: "/api".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_days: 30,
        }
    }
}

impl AuthConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// Which store implementation to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Mongodb,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "in_memory" | "in-memory" | "memory" => Ok(StorageBackend::InMemory),
            "mongodb" | "mongo" => Ok(StorageBackend::Mongodb),
            other => bail!("unknown storage backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub mongo_uri: String,
    /// Overrides the database named in `mongo_uri`
    pub database: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            mongo_uri: "mongodb://localhost:27017/learning_resource_hub".to_string(),
            database: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("invalid configuration")?;
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(uri) = lookup("MONGO_URI") {
            self.storage.mongo_uri = uri;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret must not be empty");
        }
        if self.auth.token_ttl_days == 0 {
            bail!("auth.token_ttl_days must be at least 1");
        }
        if self.auth.token_ttl_days > MAX_TOKEN_TTL_DAYS {
            bail!(
                "auth.token_ttl_days must be at most {}, got {}",
                MAX_TOKEN_TTL_DAYS,
                self.auth.token_ttl_days
            );
        }
        if !self.server.api_prefix.starts_with('/') {
            bail!(
                "server.api_prefix must start with '/', got '{}'",
                self.server.api_prefix
            );
        }
        Ok(())
    }
}
