//! Dereferencing of submitted file URIs.
//!
//! The ingest workflow is the only caller; nothing else in the server
//! reaches out to client-supplied locations.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use tokio_util::io::ReaderStream;
use tracing::debug;

use dorepo_core::config::IngestConfig;
use dorepo_core::error::{AppError, ErrorKind};
use dorepo_core::result::AppResult;
use dorepo_core::traits::storage::ByteStream;

/// Payload obtained from a source URI.
pub struct FetchedBinary {
    /// Content type reported by the source, if any.
    pub content_type: Option<String>,
    /// Payload contents.
    pub stream: ByteStream,
}

impl std::fmt::Debug for FetchedBinary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedBinary")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Opens a byte stream for a source URI.
///
/// Unusable URIs are `Validation` errors; sources that cannot be read are
/// `ExternalService` errors.
#[async_trait]
pub trait BinaryFetcher: Send + Sync + std::fmt::Debug + 'static {
    /// Open the payload behind `uri`.
    async fn fetch(&self, uri: &str) -> AppResult<FetchedBinary>;
}

/// Fetcher for `http`, `https`, and `file` URIs.
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    client: reqwest::Client,
}

impl RemoteFetcher {
    /// Build a fetcher whose HTTP requests time out after
    /// `fetch_timeout_seconds`.
    pub fn new(config: &IngestConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: Url) -> AppResult<FetchedBinary> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, format!("Failed to fetch {url}"), e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Fetching {url} returned {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!(%url, ?content_type, "Opened remote source");

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(FetchedBinary {
            content_type,
            stream: Box::pin(stream),
        })
    }

    async fn fetch_file(url: &Url) -> AppResult<FetchedBinary> {
        let path = url
            .to_file_path()
            .map_err(|()| AppError::validation(format!("Not a local file URI: {url}")))?;

        let file = tokio::fs::File::open(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Failed to open source file: {}", path.display()),
                e,
            )
        })?;
        debug!(path = %path.display(), "Opened local source");

        Ok(FetchedBinary {
            content_type: None,
            stream: Box::pin(ReaderStream::new(file)),
        })
    }
}

#[async_trait]
impl BinaryFetcher for RemoteFetcher {
    async fn fetch(&self, uri: &str) -> AppResult<FetchedBinary> {
        let url = Url::parse(uri)
            .map_err(|e| AppError::validation(format!("Invalid file URI '{uri}': {e}")))?;

        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => Self::fetch_file(&url).await,
            other => Err(AppError::validation(format!(
                "Unsupported URI scheme '{other}' in '{uri}'"
            ))),
        }
    }
}
