//! Producer handle for the async ingest queue.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;

/// One deferred ingest.
#[derive(Debug, Clone)]
pub struct ScheduledIngest {
    /// Earliest time the ingest may run
    pub run_at: DateTime<Utc>,
    /// Serialized entity document
    pub payload: Bytes,
}

/// Cloneable handle for scheduling ingests.
///
/// The schedule itself lives in the runner task; this handle only sends
/// messages to it.
#[derive(Debug, Clone)]
pub struct AsyncIngestQueue {
    /// Channel into the runner task
    sender: mpsc::UnboundedSender<ScheduledIngest>,
    /// Delay used when a caller does not give one
    default_delay: Duration,
}

impl AsyncIngestQueue {
    pub(crate) fn new(
        sender: mpsc::UnboundedSender<ScheduledIngest>,
        default_delay: Duration,
    ) -> Self {
        Self {
            sender,
            default_delay,
        }
    }

    /// Schedule `payload` to be ingested at `run_at`.
    pub fn enqueue(&self, payload: Bytes, run_at: DateTime<Utc>) -> AppResult<()> {
        self.sender
            .send(ScheduledIngest { run_at, payload })
            .map_err(|_| AppError::service_unavailable("Async ingest queue has been stopped"))
    }

    /// Schedule `payload` after `delay`, or after the configured default
    /// delay. Returns the scheduled time.
    pub fn enqueue_after(
        &self,
        payload: Bytes,
        delay: Option<Duration>,
    ) -> AppResult<DateTime<Utc>> {
        let delay = delay.unwrap_or(self.default_delay);
        let run_at = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .ok_or_else(|| AppError::validation(format!("Delay out of range: {delay:?}")))?;
        self.enqueue(payload, run_at)?;
        Ok(run_at)
    }

    /// Whether the runner task is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
