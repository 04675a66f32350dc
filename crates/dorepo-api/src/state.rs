//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use dorepo_core::config::AppConfig;
use dorepo_service::{IngestService, RetrievalService};
use dorepo_worker::AsyncIngestQueue;

/// Application state containing all shared dependencies.
///
/// Passed to the dispatcher via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Services ─────────────────────────────────────────────
    /// Synchronous ingest workflow
    pub ingest_service: Arc<IngestService>,
    /// Read path for entities, representations, and files
    pub retrieval_service: Arc<RetrievalService>,

    // ── Background ───────────────────────────────────────────
    /// Producer handle of the async ingest queue
    pub ingest_queue: AsyncIngestQueue,
}
