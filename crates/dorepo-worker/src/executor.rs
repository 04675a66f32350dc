//! Job trait driven by the ingest runner.

use async_trait::async_trait;

use dorepo_core::error::AppError;

/// Something that can ingest a queued payload.
#[async_trait]
pub trait IngestJob: Send + Sync + std::fmt::Debug + 'static {
    /// Ingest `payload`, returning the entity identifier.
    async fn run(&self, payload: &[u8]) -> Result<String, JobExecutionError>;
}

/// Error from running a queued ingest. Neither variant is retried.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// The payload itself was refused (malformed, invalid, or conflicting)
    #[error("Rejected ingest payload: {0}")]
    Rejected(String),

    /// Ingest failed for a reason outside the payload
    #[error("Ingest failed: {0}")]
    Failed(AppError),
}

impl From<AppError> for JobExecutionError {
    fn from(err: AppError) -> Self {
        if err.kind.is_client_error() {
            Self::Rejected(err.to_string())
        } else {
            Self::Failed(err)
        }
    }
}
