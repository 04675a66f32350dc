//! In-memory storage provider backed by dashmap.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use dorepo_core::error::{AppError, ErrorKind};
use dorepo_core::result::AppResult;
use dorepo_core::traits::storage::{
    ByteStream, StorageProvider, StoredBinary, collect_stream, stream_from_bytes,
};

use super::key_segments;

#[derive(Debug, Clone)]
struct MemoryBinary {
    content_type: String,
    data: Bytes,
}

/// In-memory storage provider. Contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageProvider {
    /// Document id → version → XML bytes.
    documents: Arc<DashMap<String, BTreeMap<u32, Bytes>>>,
    /// Binary key → payload.
    binaries: Arc<DashMap<String, MemoryBinary>>,
}

impl MemoryStorageProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn save_document(
        &self,
        id: &str,
        version: u32,
        xml: Bytes,
        overwrite: bool,
    ) -> AppResult<()> {
        key_segments(id)?;
        let mut versions = self.documents.entry(id.to_string()).or_default();
        if !overwrite && versions.contains_key(&version) {
            return Err(AppError::conflict(format!(
                "Document {id} version {version} already exists"
            )));
        }
        versions.insert(version, xml);
        Ok(())
    }

    async fn latest_document_version(&self, id: &str) -> AppResult<Option<u32>> {
        Ok(self
            .documents
            .get(id)
            .and_then(|versions| versions.keys().next_back().copied()))
    }

    async fn read_document_version(&self, id: &str, version: u32) -> AppResult<Bytes> {
        self.documents
            .get(id)
            .and_then(|versions| versions.get(&version).cloned())
            .ok_or_else(|| {
                AppError::not_found(format!("Document not found: {id} (version {version})"))
            })
    }

    async fn save_binary(
        &self,
        key: &str,
        content_type: &str,
        stream: ByteStream,
        overwrite: bool,
    ) -> AppResult<u64> {
        key_segments(key)?;
        if !overwrite && self.binaries.contains_key(key) {
            return Err(AppError::conflict(format!("Binary {key} already exists")));
        }

        let data = collect_stream(stream).await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Stream read error", e)
        })?;
        let size = data.len() as u64;
        let binary = MemoryBinary {
            content_type: content_type.to_string(),
            data,
        };

        // Re-checked under the shard lock; a concurrent writer may have won
        // while the stream was draining.
        match self.binaries.entry(key.to_string()) {
            Entry::Occupied(_) if !overwrite => {
                return Err(AppError::conflict(format!("Binary {key} already exists")));
            }
            Entry::Occupied(mut occupied) => {
                occupied.insert(binary);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(binary);
            }
        }

        debug!(key, content_type, bytes = size, "Stored binary in memory");
        Ok(size)
    }

    async fn read_binary(&self, key: &str) -> AppResult<StoredBinary> {
        let binary = self
            .binaries
            .get(key)
            .map(|b| b.value().clone())
            .ok_or_else(|| AppError::not_found(format!("File not found: {key}")))?;

        Ok(StoredBinary {
            content_type: binary.content_type,
            size_bytes: binary.data.len() as u64,
            stream: stream_from_bytes(binary.data),
        })
    }

    async fn binary_exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.binaries.contains_key(key))
    }

    async fn delete_binary(&self, key: &str) -> AppResult<()> {
        self.binaries.remove(key);
        Ok(())
    }

    async fn purge(&self) -> AppResult<()> {
        self.documents.clear();
        self.binaries.clear();
        Ok(())
    }
}
