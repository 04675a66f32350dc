//! Queued ingests run through the regular ingest workflow.

use async_trait::async_trait;

use dorepo_service::IngestService;

use crate::executor::{IngestJob, JobExecutionError};

#[async_trait]
impl IngestJob for IngestService {
    async fn run(&self, payload: &[u8]) -> Result<String, JobExecutionError> {
        Ok(self.ingest(payload).await?)
    }
}
