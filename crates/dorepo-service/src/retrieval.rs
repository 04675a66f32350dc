//! Read-only resolution of entities, representations, and files.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;
use dorepo_core::traits::storage::{StorageProvider, StoredBinary};
use dorepo_entity::file::key::is_valid_segment;
use dorepo_entity::{FileKey, Marshaller};

/// Serves stored documents and binaries. Never writes.
#[derive(Clone)]
pub struct RetrievalService {
    /// Document and binary store.
    storage: Arc<dyn StorageProvider>,
    /// Wire format.
    marshaller: Arc<dyn Marshaller>,
}

impl std::fmt::Debug for RetrievalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalService")
            .field("storage", &self.storage.provider_type())
            .finish()
    }
}

impl RetrievalService {
    /// Creates a new retrieval service.
    pub fn new(storage: Arc<dyn StorageProvider>, marshaller: Arc<dyn Marshaller>) -> Self {
        Self {
            storage,
            marshaller,
        }
    }

    /// Media type of documents returned by this service.
    pub fn content_type(&self) -> &'static str {
        self.marshaller.content_type()
    }

    /// Latest stored document of an entity, byte for byte.
    pub async fn entity(&self, id: &str) -> AppResult<Bytes> {
        if !is_valid_segment(id) {
            return Err(AppError::not_found(format!("Entity not found: {id}")));
        }
        self.storage.read_document(id).await
    }

    /// One representation of the latest stored entity, serialized on its own.
    pub async fn representation(&self, entity_id: &str, representation_id: &str) -> AppResult<Bytes> {
        let xml = self.entity(entity_id).await?;
        let entity = self.marshaller.deserialize_entity(&xml)?;

        let representation = entity.representation(representation_id).ok_or_else(|| {
            AppError::not_found(format!(
                "Representation not found: {entity_id}/{representation_id}"
            ))
        })?;
        debug!(entity_id, representation_id, "Resolved representation");

        self.marshaller.serialize_representation(representation)
    }

    /// Stored binary under `key`, with its recorded content type.
    pub async fn file(&self, key: &FileKey) -> AppResult<StoredBinary> {
        self.storage.read_binary(&key.to_string()).await
    }
}
