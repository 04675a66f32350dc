//! Storage provider trait for the document and binary store.
//!
//! Two keyspaces live behind one provider: XML metadata documents keyed
//! by entity identifier and version, and binary payloads keyed by the
//! composite `entity/representation/file` key. Keys are opaque to the
//! provider beyond being `/`-separated path segments.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};

use crate::result::AppResult;

/// A byte stream type used for reading and writing binary contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Wrap an in-memory buffer as a single-chunk [`ByteStream`].
pub fn stream_from_bytes(data: Bytes) -> ByteStream {
    Box::pin(futures::stream::once(async move { Ok(data) }))
}

/// Drain a [`ByteStream`] into one contiguous buffer.
pub async fn collect_stream(stream: ByteStream) -> Result<Bytes, std::io::Error> {
    let chunks: Vec<Bytes> = stream.try_collect().await?;
    if chunks.len() == 1 {
        return Ok(chunks.into_iter().next().unwrap_or_default());
    }
    let mut buf = bytes::BytesMut::with_capacity(chunks.iter().map(Bytes::len).sum());
    for chunk in chunks {
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

/// A binary payload read back from storage.
pub struct StoredBinary {
    /// MIME type recorded when the binary was saved.
    pub content_type: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// Payload contents.
    pub stream: ByteStream,
}

impl std::fmt::Debug for StoredBinary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredBinary")
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// Trait for document/binary storage backends.
///
/// Implementations must report missing keys as `ErrorKind::NotFound` and
/// existing keys written with `overwrite = false` as `ErrorKind::Conflict`.
/// Creation with `overwrite = false` must be atomic per key.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Persist a metadata document under `id` and `version`.
    async fn save_document(
        &self,
        id: &str,
        version: u32,
        xml: Bytes,
        overwrite: bool,
    ) -> AppResult<()>;

    /// Highest stored version of a document, if any version exists.
    async fn latest_document_version(&self, id: &str) -> AppResult<Option<u32>>;

    /// Read one specific version of a document.
    async fn read_document_version(&self, id: &str, version: u32) -> AppResult<Bytes>;

    /// Read the latest version of a document.
    async fn read_document(&self, id: &str) -> AppResult<Bytes> {
        match self.latest_document_version(id).await? {
            Some(version) => self.read_document_version(id, version).await,
            None => Err(crate::AppError::not_found(format!("Document not found: {id}"))),
        }
    }

    /// Persist a binary payload from a stream. Returns the number of bytes written.
    async fn save_binary(
        &self,
        key: &str,
        content_type: &str,
        stream: ByteStream,
        overwrite: bool,
    ) -> AppResult<u64>;

    /// Read a binary payload and its recorded content type.
    async fn read_binary(&self, key: &str) -> AppResult<StoredBinary>;

    /// Check whether a binary exists under `key`.
    async fn binary_exists(&self, key: &str) -> AppResult<bool>;

    /// Remove a binary. Removing a missing key is not an error.
    async fn delete_binary(&self, key: &str) -> AppResult<()>;

    /// Remove every document and binary.
    async fn purge(&self) -> AppResult<()>;
}
