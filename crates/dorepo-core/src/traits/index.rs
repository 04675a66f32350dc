//! Search index trait.
//!
//! The index is only fed and reset by the ingest lifecycle; there is no
//! query surface exposed over HTTP.

use async_trait::async_trait;

use crate::result::AppResult;

/// A flattened document handed to the index on ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexDocument {
    /// Entity identifier, the index key.
    pub id: String,
    /// Entity version.
    pub version: u32,
    /// Searchable `(field, value)` pairs.
    pub fields: Vec<(String, String)>,
}

/// Trait for the entity search index.
#[async_trait]
pub trait SearchIndex: Send + Sync + std::fmt::Debug + 'static {
    /// Add or replace the document for `doc.id`.
    async fn add(&self, doc: IndexDocument) -> AppResult<()>;

    /// Whether a document is indexed under `id`.
    async fn contains(&self, id: &str) -> AppResult<bool>;

    /// Drop every indexed document.
    async fn purge(&self) -> AppResult<()>;

    /// Release the index. Further calls to [`SearchIndex::add`] fail.
    /// Closing twice is a no-op.
    async fn close(&self) -> AppResult<()>;
}
