//! Ingestion workflow configuration.

use serde::{Deserialize, Serialize};

/// What happens when an entity is submitted under an identifier that
/// already has a stored metadata document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReingestPolicy {
    /// Refuse the submission with a conflict error.
    #[default]
    Reject,
    /// Replace the stored document of the same version.
    Overwrite,
    /// Store the submission as the next version; retrieval serves the latest.
    NewVersion,
}

/// Ingestion workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Re-ingest policy for existing identifiers.
    #[serde(default)]
    pub reingest_policy: ReingestPolicy,
    /// Timeout for fetching a single remote file, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
    /// MIME type recorded for files that do not declare one.
    #[serde(default = "default_mime_type")]
    pub default_mime_type: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            reingest_policy: ReingestPolicy::default(),
            fetch_timeout_seconds: default_fetch_timeout(),
            default_mime_type: default_mime_type(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_mime_type() -> String {
    "application/octet-stream".to_string()
}
