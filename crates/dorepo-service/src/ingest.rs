//! Entity ingestion workflow.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use dorepo_core::config::{IngestConfig, ReingestPolicy};
use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;
use dorepo_core::traits::index::{IndexDocument, SearchIndex};
use dorepo_core::traits::storage::StorageProvider;
use dorepo_entity::{FileKey, IntellectualEntity, LifecycleState, Marshaller, Representation};

use crate::fetch::BinaryFetcher;

/// Where the metadata document of an ingest will be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DocumentTarget {
    version: u32,
    overwrite: bool,
}

/// Turns a submitted entity into stored binaries plus a stored metadata
/// document whose file URIs point back at this server.
#[derive(Clone)]
pub struct IngestService {
    /// Document and binary store.
    storage: Arc<dyn StorageProvider>,
    /// Search index updated after each ingest.
    index: Arc<dyn SearchIndex>,
    /// Source URI dereferencing.
    fetcher: Arc<dyn BinaryFetcher>,
    /// Wire format.
    marshaller: Arc<dyn Marshaller>,
    /// Ingestion settings.
    config: IngestConfig,
    /// Base of rewritten file URIs.
    public_url: String,
}

impl std::fmt::Debug for IngestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestService")
            .field("storage", &self.storage.provider_type())
            .field("reingest_policy", &self.config.reingest_policy)
            .field("public_url", &self.public_url)
            .finish()
    }
}

impl IngestService {
    /// Creates a new ingest service.
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        index: Arc<dyn SearchIndex>,
        fetcher: Arc<dyn BinaryFetcher>,
        marshaller: Arc<dyn Marshaller>,
        config: IngestConfig,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            index,
            fetcher,
            marshaller,
            config,
            public_url: public_url.into(),
        }
    }

    /// Ingest a submitted entity document. Returns the entity identifier.
    pub async fn ingest(&self, xml: &[u8]) -> AppResult<String> {
        let entity = self.marshaller.deserialize_entity(xml)?;
        self.ingest_entity(entity).await
    }

    /// Ingest an already decoded entity.
    ///
    /// Every binary is stored before the metadata document. If any step
    /// before the document write fails, binaries created by this call are
    /// removed again and no document appears. Binaries that existed before
    /// the call are never removed, since a stored document may point at them.
    ///
    /// Indexing is best-effort: once the document is stored the ingest
    /// succeeds even if the index rejects it.
    pub async fn ingest_entity(&self, entity: IntellectualEntity) -> AppResult<String> {
        entity.validate()?;
        let id = entity.identifier().to_string();

        let existing = self.storage.latest_document_version(&id).await?;
        let target = self.document_target(&entity, existing)?;
        info!(
            entity_id = %id,
            version = target.version,
            files = entity.file_count(),
            "Ingesting entity"
        );

        let mut created = Vec::new();
        let stored = match self.store_entity(&entity, target, &mut created).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(entity_id = %id, error = %e, "Ingest failed, removing created binaries");
                self.remove_binaries(&created).await;
                return Err(e);
            }
        };

        if let Err(e) = self.index.add(index_document(&stored)).await {
            warn!(entity_id = %id, error = %e, "Stored entity could not be indexed");
        }

        info!(entity_id = %id, version = target.version, "Entity ingested");
        Ok(id)
    }

    /// Resolve the document version for this submission from the policy.
    fn document_target(
        &self,
        entity: &IntellectualEntity,
        existing: Option<u32>,
    ) -> AppResult<DocumentTarget> {
        let Some(latest) = existing else {
            return Ok(DocumentTarget {
                version: entity.version(),
                overwrite: self.config.reingest_policy == ReingestPolicy::Overwrite,
            });
        };

        match self.config.reingest_policy {
            ReingestPolicy::Reject => Err(AppError::conflict(format!(
                "Entity '{}' has already been ingested",
                entity.identifier()
            ))),
            ReingestPolicy::Overwrite => Ok(DocumentTarget {
                version: latest,
                overwrite: true,
            }),
            ReingestPolicy::NewVersion => Ok(DocumentTarget {
                version: latest.saturating_add(1),
                overwrite: false,
            }),
        }
    }

    /// Store binaries, then the stamped document. Keys of binaries this call
    /// created are appended to `created`.
    async fn store_entity(
        &self,
        entity: &IntellectualEntity,
        target: DocumentTarget,
        created: &mut Vec<String>,
    ) -> AppResult<IntellectualEntity> {
        let mut representations = Vec::with_capacity(entity.representations().len());
        for rep in entity.representations() {
            representations.push(self.store_representation(entity, rep, created).await?);
        }

        let stored = entity
            .with_representations(representations)
            .with_version(target.version)
            .with_lifecycle(LifecycleState::ingested_at(Utc::now()));

        let xml = self.marshaller.serialize_entity(&stored)?;
        self.storage
            .save_document(stored.identifier(), target.version, xml, target.overwrite)
            .await?;
        Ok(stored)
    }

    async fn store_representation(
        &self,
        entity: &IntellectualEntity,
        rep: &Representation,
        created: &mut Vec<String>,
    ) -> AppResult<Representation> {
        // Binary keys are not versioned; only the reject policy forbids
        // replacing an existing payload.
        let overwrite = self.config.reingest_policy != ReingestPolicy::Reject;

        let mut files = Vec::with_capacity(rep.files().len());
        for file in rep.files() {
            let key = FileKey::new(entity.identifier(), rep.identifier(), file.identifier());
            let fetched = self.fetcher.fetch(file.uri()).await?;
            let content_type = file
                .mime_type()
                .map(str::to_string)
                .or(fetched.content_type)
                .unwrap_or_else(|| self.config.default_mime_type.clone());

            let storage_key = key.to_string();
            let replaced = overwrite && self.storage.binary_exists(&storage_key).await?;
            let size = self
                .storage
                .save_binary(&storage_key, &content_type, fetched.stream, overwrite)
                .await?;
            if !replaced {
                created.push(storage_key);
            }
            info!(key = %key, content_type = %content_type, bytes = size, "Stored file");

            files.push(file.with_uri(key.public_uri(&self.public_url)));
        }
        Ok(rep.with_files(files))
    }

    async fn remove_binaries(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.storage.delete_binary(key).await {
                warn!(key = %key, error = %e, "Failed to remove binary of failed ingest");
            }
        }
    }
}

/// Flatten an ingested entity into index fields.
fn index_document(entity: &IntellectualEntity) -> IndexDocument {
    let mut fields = Vec::new();
    if let Some(descriptive) = entity.descriptive() {
        fields.push(("descriptive.type".to_string(), descriptive.kind().to_string()));
        for element in descriptive.elements() {
            fields.push((element.name().to_string(), element.value().to_string()));
        }
    }
    for rep in entity.representations() {
        fields.push(("representation".to_string(), rep.identifier().to_string()));
    }

    IndexDocument {
        id: entity.identifier().to_string(),
        version: entity.version(),
        fields,
    }
}
