//! Storage provider configuration.

use serde::{Deserialize, Serialize};

/// Which storage backend holds documents and binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageProviderKind {
    /// Plain files below `root_path`.
    Local,
    /// Process memory; everything is lost on exit.
    Memory,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend.
    #[serde(default = "default_provider")]
    pub provider: StorageProviderKind,
    /// Root directory for the local provider.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            root_path: default_root_path(),
        }
    }
}

fn default_provider() -> StorageProviderKind {
    StorageProviderKind::Local
}

fn default_root_path() -> String {
    "./data/repository".to_string()
}
