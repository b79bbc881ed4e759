//! Storage implementations for different backends

#[cfg(feature = "in-memory")]
pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryStore;
#[cfg(feature = "mongodb_backend")]
pub use mongodb::MongoStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::store::{ResourceStore, UserStore};
use anyhow::Result;
use std::sync::Arc;

/// The pair of stores the services run against
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub resources: Arc<dyn ResourceStore>,
}

impl Stores {
    /// Both stores backed by one shared value
    pub fn shared<S>(store: S) -> Self
    where
        S: UserStore + ResourceStore + Clone + 'static,
    {
        Self {
            users: Arc::new(store.clone()),
            resources: Arc::new(store),
        }
    }

    #[cfg(feature = "in-memory")]
    pub fn in_memory() -> Self {
        Self::shared(InMemoryStore::new())
    }
}

/// Open the backend selected by `config`
pub async fn connect(config: &StorageConfig) -> Result<Stores> {
    match config.backend {
        #[cfg(feature = "in-memory")]
        StorageBackend::InMemory => {
            tracing::info!("using in-memory storage");
            Ok(Stores::in_memory())
        }
        #[cfg(feature = "mongodb_backend")]
        StorageBackend::Mongodb => {
            let store = MongoStore::connect(&config.mongo_uri, config.database.as_deref()).await?;
            Ok(Stores::shared(store))
        }
        #[allow(unreachable_patterns)]
        other => anyhow::bail!(
            "storage backend {:?} is not compiled in; enable its cargo feature",
            other
        ),
    }
}
