//! Storage manager that holds the configured provider.

use std::sync::Arc;

use tracing::info;

use dorepo_core::config::{StorageConfig, StorageProviderKind};
use dorepo_core::result::AppResult;
use dorepo_core::traits::storage::StorageProvider;

use crate::providers::{LocalStorageProvider, MemoryStorageProvider};

/// Wraps the storage provider selected by configuration.
#[derive(Debug, Clone)]
pub struct StorageManager {
    /// The inner storage provider.
    inner: Arc<dyn StorageProvider>,
}

impl StorageManager {
    /// Create a storage manager from configuration.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn StorageProvider> = match config.provider {
            StorageProviderKind::Local => {
                info!(root = %config.root_path, "Initializing local storage provider");
                Arc::new(LocalStorageProvider::new(&config.root_path).await?)
            }
            StorageProviderKind::Memory => {
                info!("Initializing in-memory storage provider");
                Arc::new(MemoryStorageProvider::new())
            }
        };

        Ok(Self { inner })
    }

    /// Create a storage manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn StorageProvider>) -> Self {
        Self { inner: provider }
    }

    /// Shared handle to the provider.
    pub fn provider(&self) -> Arc<dyn StorageProvider> {
        Arc::clone(&self.inner)
    }
}
