//! Async ingestion queue configuration.

use serde::{Deserialize, Serialize};

/// Background ingestion queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the queue task is started with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in milliseconds between schedule sweeps.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Delay applied to deferred ingests that do not specify one.
    #[serde(default = "default_delay")]
    pub default_delay_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: default_poll_interval(),
            default_delay_ms: default_delay(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    500
}

fn default_delay() -> u64 {
    1000
}
