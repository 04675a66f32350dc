//! Local filesystem storage provider.
//!
//! Layout below the root:
//!
//! ```text
//! documents/{id}/{version}.xml
//! binaries/{entity}/{representation}/{file}
//! mimetypes/{entity}/{representation}/{file}
//! ```

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use dorepo_core::error::{AppError, ErrorKind};
use dorepo_core::result::AppResult;
use dorepo_core::traits::storage::{ByteStream, StorageProvider, StoredBinary};

use super::key_segments;

const DOCUMENTS_DIR: &str = "documents";
const BINARIES_DIR: &str = "binaries";
const MIMETYPES_DIR: &str = "mimetypes";
const DOCUMENT_EXT: &str = "xml";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored data.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Root directory of this provider.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_dir(&self, id: &str) -> AppResult<PathBuf> {
        let segments = key_segments(id)?;
        if segments.len() != 1 {
            return Err(AppError::validation(format!("Invalid document id: '{id}'")));
        }
        Ok(self.root.join(DOCUMENTS_DIR).join(id))
    }

    fn document_path(&self, id: &str, version: u32) -> AppResult<PathBuf> {
        Ok(self
            .document_dir(id)?
            .join(format!("{version}.{DOCUMENT_EXT}")))
    }

    fn keyed_path(&self, tree: &str, key: &str) -> AppResult<PathBuf> {
        let mut path = self.root.join(tree);
        for segment in key_segments(key)? {
            path.push(segment);
        }
        Ok(path)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Open `path` for writing. Without `overwrite` the file must not
    /// exist yet; the check and the creation are one filesystem call.
    async fn open_for_write(&self, path: &Path, overwrite: bool, what: &str) -> AppResult<fs::File> {
        self.ensure_parent(path).await?;

        let mut options = fs::OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        options.open(path).await.map_err(|e| {
            if e.kind() == IoErrorKind::AlreadyExists {
                AppError::conflict(format!("{what} already exists"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to create {what}"), e)
            }
        })
    }

    async fn remove_if_exists(path: &Path) -> AppResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {}", path.display()),
                e,
            )),
        }
    }

    async fn remove_tree(&self, tree: &str) -> AppResult<()> {
        let path = self.root.join(tree);
        match fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete directory: {}", path.display()),
                e,
            )),
        }
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn save_document(
        &self,
        id: &str,
        version: u32,
        xml: Bytes,
        overwrite: bool,
    ) -> AppResult<()> {
        let path = self.document_path(id, version)?;
        let what = format!("Document {id} version {version}");
        let mut file = self.open_for_write(&path, overwrite, &what).await?;

        file.write_all(&xml).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write {what}"), e)
        })?;
        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))?;

        debug!(id, version, bytes = xml.len(), "Wrote document");
        Ok(())
    }

    async fn latest_document_version(&self, id: &str) -> AppResult<Option<u32>> {
        let dir_path = self.document_dir(id)?;
        let mut dir = match fs::read_dir(&dir_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list versions of document: {id}"),
                    e,
                ));
            }
        };

        let mut latest = None;
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let name = entry.file_name();
            let version = name
                .to_str()
                .and_then(|n| n.strip_suffix(DOCUMENT_EXT))
                .and_then(|n| n.strip_suffix('.'))
                .and_then(|n| n.parse::<u32>().ok());
            if let Some(v) = version {
                latest = latest.max(Some(v));
            }
        }
        Ok(latest)
    }

    async fn read_document_version(&self, id: &str, version: u32) -> AppResult<Bytes> {
        let path = self.document_path(id, version)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == IoErrorKind::NotFound {
                AppError::not_found(format!("Document not found: {id} (version {version})"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read document: {id}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn save_binary(
        &self,
        key: &str,
        content_type: &str,
        mut stream: ByteStream,
        overwrite: bool,
    ) -> AppResult<u64> {
        let path = self.keyed_path(BINARIES_DIR, key)?;
        let mime_path = self.keyed_path(MIMETYPES_DIR, key)?;
        let what = format!("Binary {key}");
        let mut file = self.open_for_write(&path, overwrite, &what).await?;

        let mut total_bytes = 0u64;
        let copied: AppResult<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| {
                    AppError::with_source(ErrorKind::ExternalService, "Stream read error", e)
                })?;
                total_bytes += chunk.len() as u64;
                file.write_all(&chunk).await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
                })?;
            }
            file.flush()
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))
        }
        .await;

        if let Err(err) = copied {
            drop(file);
            if let Err(cleanup) = Self::remove_if_exists(&path).await {
                warn!(key, error = %cleanup, "Failed to remove partial binary");
            }
            return Err(err);
        }

        self.ensure_parent(&mime_path).await?;
        fs::write(&mime_path, content_type.as_bytes())
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to record content type for: {key}"),
                    e,
                )
            })?;

        debug!(key, content_type, bytes = total_bytes, "Wrote binary from stream");
        Ok(total_bytes)
    }

    async fn read_binary(&self, key: &str) -> AppResult<StoredBinary> {
        let path = self.keyed_path(BINARIES_DIR, key)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == IoErrorKind::NotFound {
                AppError::not_found(format!("File not found: {key}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open file: {key}"), e)
            }
        })?;
        let size_bytes = file
            .metadata()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to get metadata", e))?
            .len();

        let mime_path = self.keyed_path(MIMETYPES_DIR, key)?;
        let content_type = match fs::read_to_string(&mime_path).await {
            Ok(mime) if !mime.trim().is_empty() => mime.trim().to_string(),
            Ok(_) => FALLBACK_MIME_TYPE.to_string(),
            Err(e) if e.kind() == IoErrorKind::NotFound => FALLBACK_MIME_TYPE.to_string(),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read content type for: {key}"),
                    e,
                ));
            }
        };

        Ok(StoredBinary {
            content_type,
            size_bytes,
            stream: Box::pin(ReaderStream::new(file)),
        })
    }

    async fn binary_exists(&self, key: &str) -> AppResult<bool> {
        let path = self.keyed_path(BINARIES_DIR, key)?;
        fs::try_exists(&path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to stat file: {key}"), e)
        })
    }

    async fn delete_binary(&self, key: &str) -> AppResult<()> {
        Self::remove_if_exists(&self.keyed_path(BINARIES_DIR, key)?).await?;
        Self::remove_if_exists(&self.keyed_path(MIMETYPES_DIR, key)?).await
    }

    async fn purge(&self) -> AppResult<()> {
        for tree in [DOCUMENTS_DIR, BINARIES_DIR, MIMETYPES_DIR] {
            self.remove_tree(tree).await?;
        }
        debug!(root = %self.root.display(), "Purged local storage");
        Ok(())
    }
}
