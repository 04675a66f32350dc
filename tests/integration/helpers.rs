//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;

use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use http::{Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use dorepo_api::RepositoryServer;
use dorepo_core::config::{AppConfig, ReingestPolicy, StorageProviderKind};

/// Base URL ingested file URIs are rewritten against.
pub const PUBLIC_URL: &str = "http://repo.test";

/// Test application context
pub struct TestApp {
    /// The started server
    pub server: RepositoryServer,
    /// The Axum router for making test requests
    pub router: Router,
    /// Directory holding source files referenced by submissions
    pub sources: TempDir,
}

impl TestApp {
    /// Create and start a server backed by memory storage.
    pub async fn new() -> Self {
        Self::with_policy(ReingestPolicy::Reject).await
    }

    /// Create and start a server with the given re-ingest policy.
    pub async fn with_policy(policy: ReingestPolicy) -> Self {
        Self::with_config(test_config(policy)).await
    }

    /// Create and start a server from `config`.
    pub async fn with_config(config: AppConfig) -> Self {
        let server = RepositoryServer::new(config)
            .await
            .expect("Failed to build server");
        server.start().await.expect("Failed to start server");
        let router = server.router();
        let sources = tempfile::tempdir().expect("Failed to create source dir");

        Self {
            server,
            router,
            sources,
        }
    }

    /// Write a source file and return its `file://` URI.
    pub fn source_file(&self, name: &str, contents: &[u8]) -> String {
        let path = self.sources.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write source file");
        file_uri(&path)
    }

    /// URI of a source file that does not exist.
    pub fn missing_source(&self, name: &str) -> String {
        file_uri(&self.sources.path().join(name))
    }

    /// POST an entity document to `/entity`.
    pub async fn ingest(&self, xml: &str) -> TestResponse {
        self.request("POST", "/entity", Some(Bytes::from(xml.to_string())))
            .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Bytes>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if body.is_some() {
            req = req.header(header::CONTENT_TYPE, "application/xml");
        }

        let req = req
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            content_type,
            body,
        }
    }
}

/// Configuration for a memory-backed server with a fast queue sweep.
pub fn test_config(policy: ReingestPolicy) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.public_url = PUBLIC_URL.to_string();
    config.storage.provider = StorageProviderKind::Memory;
    config.ingest.reingest_policy = policy;
    config.worker.poll_interval_ms = 10;
    config
}

/// `file://` URI for an absolute path.
pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Entity document with a single representation.
pub fn entity_xml(id: &str, representation: &str, files: &[(&str, &str, Option<&str>)]) -> String {
    let files: String = files
        .iter()
        .map(|(file_id, uri, mime)| {
            let mime = mime
                .map(|m| format!("<mimetype>{m}</mimetype>"))
                .unwrap_or_default();
            format!("<file><identifier>{file_id}</identifier><uri>{uri}</uri>{mime}</file>")
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<entity>
  <identifier>{id}</identifier>
  <descriptive type="dc"><element name="title">Test entity {id}</element></descriptive>
  <representation>
    <identifier>{representation}</identifier>
    <title>Original scans</title>
    {files}
  </representation>
</entity>"#
    )
}

/// Entity document with an identifier and nothing else.
pub fn bare_entity_xml(id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><entity><identifier>{id}</identifier></entity>"#
    )
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header, if any
    pub content_type: Option<String>,
    /// Raw body
    pub body: Bytes,
}

impl TestResponse {
    /// Body as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("Body is not UTF-8")
    }

    /// Body parsed as JSON, or `Null`.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    /// The `error` code of a JSON error body.
    pub fn error_code(&self) -> Option<String> {
        self.json()
            .get("error")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}
