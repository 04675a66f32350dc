//! In-memory search index.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};

use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;
use dorepo_core::traits::index::{IndexDocument, SearchIndex};

/// Search index held in process memory, keyed by entity id.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    documents: Arc<DashMap<String, IndexDocument>>,
    closed: Arc<AtomicBool>,
}

impl MemoryIndex {
    /// Create an empty, open index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Indexed document for `id`, if any.
    pub fn get(&self, id: &str) -> Option<IndexDocument> {
        self.documents.get(id).map(|d| d.value().clone())
    }

    /// Whether [`SearchIndex::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn add(&self, doc: IndexDocument) -> AppResult<()> {
        if self.is_closed() {
            return Err(AppError::service_unavailable("Search index is closed"));
        }
        debug!(id = %doc.id, version = doc.version, fields = doc.fields.len(), "Indexed entity");
        self.documents.insert(doc.id.clone(), doc);
        Ok(())
    }

    async fn contains(&self, id: &str) -> AppResult<bool> {
        Ok(self.documents.contains_key(id))
    }

    async fn purge(&self) -> AppResult<()> {
        self.documents.clear();
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!(documents = self.documents.len(), "Search index closed");
        }
        Ok(())
    }
}
