//! Application builder: wires storage, index, services, queue, and router
//! into a server with an explicit start/close lifecycle.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use dorepo_core::config::AppConfig;
use dorepo_core::error::{AppError, ErrorKind};
use dorepo_core::result::AppResult;
use dorepo_core::traits::index::SearchIndex;
use dorepo_core::traits::storage::StorageProvider;
use dorepo_entity::{Marshaller, XmlMarshaller};
use dorepo_service::{BinaryFetcher, IngestService, RemoteFetcher, RetrievalService};
use dorepo_storage::{MemoryIndex, StorageManager};
use dorepo_worker::{AsyncIngestQueue, IngestRunner};

use crate::router::build_router;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Started,
    Closed,
}

/// A repository server: shared state plus the resources whose lifetime
/// spans all requests.
#[derive(Debug)]
pub struct RepositoryServer {
    /// State handed to every request
    state: AppState,
    /// Document and binary store
    storage: Arc<dyn StorageProvider>,
    /// Search index
    index: Arc<dyn SearchIndex>,
    /// Async ingest queue task
    runner: IngestRunner,
    /// Where the server is in its lifecycle
    lifecycle: Mutex<Lifecycle>,
}

impl RepositoryServer {
    /// Build a server from configuration: the configured storage provider,
    /// an in-memory index, and a fetcher for `http`, `https`, and `file`
    /// URIs.
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let storage = StorageManager::new(&config.storage).await?.provider();
        let fetcher = Arc::new(RemoteFetcher::new(&config.ingest)?);
        Ok(Self::with_components(
            config,
            storage,
            Arc::new(MemoryIndex::new()),
            fetcher,
        ))
    }

    /// Build a server around existing components.
    pub fn with_components(
        config: AppConfig,
        storage: Arc<dyn StorageProvider>,
        index: Arc<dyn SearchIndex>,
        fetcher: Arc<dyn BinaryFetcher>,
    ) -> Self {
        let config = Arc::new(config);
        let marshaller: Arc<dyn Marshaller> = Arc::new(XmlMarshaller::new());

        let ingest_service = Arc::new(IngestService::new(
            Arc::clone(&storage),
            Arc::clone(&index),
            fetcher,
            Arc::clone(&marshaller),
            config.ingest.clone(),
            config.server.public_url.clone(),
        ));
        let retrieval_service = Arc::new(RetrievalService::new(
            Arc::clone(&storage),
            Arc::clone(&marshaller),
        ));

        let runner = IngestRunner::new(
            Arc::clone(&ingest_service) as Arc<dyn dorepo_worker::IngestJob>,
            &config.worker,
        );

        let state = AppState {
            config,
            ingest_service,
            retrieval_service,
            ingest_queue: runner.queue(),
        };

        Self {
            state,
            storage,
            index,
            runner,
            lifecycle: Mutex::new(Lifecycle::Created),
        }
    }

    /// Shared request state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Producer handle of the async ingest queue.
    pub fn queue(&self) -> AsyncIngestQueue {
        self.state.ingest_queue.clone()
    }

    /// Storage provider behind this server.
    pub fn storage(&self) -> Arc<dyn StorageProvider> {
        Arc::clone(&self.storage)
    }

    /// Search index behind this server.
    pub fn index(&self) -> Arc<dyn SearchIndex> {
        Arc::clone(&self.index)
    }

    /// The HTTP application.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Purge storage and launch the queue task. Starting twice is a no-op;
    /// a closed server cannot be started again.
    pub async fn start(&self) -> AppResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        match *lifecycle {
            Lifecycle::Started => return Ok(()),
            Lifecycle::Closed => {
                return Err(AppError::service_unavailable("Server has been closed"));
            }
            Lifecycle::Created => {}
        }

        tracing::info!(
            "Starting repository server (storage: {})...",
            self.storage.provider_type()
        );
        self.storage.purge().await?;

        if self.state.config.worker.enabled {
            self.runner.start().await?;
        } else {
            tracing::info!("Async ingest queue disabled by configuration");
        }

        *lifecycle = Lifecycle::Started;
        Ok(())
    }

    /// Stop and join the queue task, purge storage, and close the index.
    /// Closing twice, or closing a server that never started, is safe.
    pub async fn close(&self) -> AppResult<()> {
        let mut lifecycle = self.lifecycle.lock().await;
        if *lifecycle == Lifecycle::Closed {
            return Ok(());
        }
        *lifecycle = Lifecycle::Closed;

        tracing::info!("Closing repository server...");
        self.runner.stop().await;
        self.storage.purge().await?;
        self.index.close().await?;
        tracing::info!("Repository server closed");
        Ok(())
    }

    /// Serve HTTP on `listener` until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!("Listening on {}", addr);

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))
    }
}
