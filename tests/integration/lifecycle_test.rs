//! Integration tests for server lifecycle and the async ingest queue.

mod helpers;

use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use http::StatusCode;

use dorepo_core::error::ErrorKind;
use helpers::{TestApp, bare_entity_xml};

fn titled_entity(id: &str, title: &str) -> Bytes {
    Bytes::from(format!(
        r#"<entity><identifier>{id}</identifier><descriptive type="dc"><element name="title">{title}</element></descriptive></entity>"#
    ))
}

/// Poll until `path` answers 200 or the deadline passes.
async fn wait_for(app: &TestApp, path: &str) -> Option<String> {
    for _ in 0..200 {
        let response = app.request("GET", path, None).await;
        if response.status == StatusCode::OK {
            return Some(response.text());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

#[tokio::test]
async fn test_queued_ingest_becomes_retrievable() {
    let app = TestApp::new().await;

    let run_at = app
        .server
        .queue()
        .enqueue_after(Bytes::from(bare_entity_xml("queued")), Some(Duration::ZERO))
        .unwrap();
    assert!(run_at <= Utc::now());

    let xml = wait_for(&app, "/entity/queued")
        .await
        .expect("queued entity was never ingested");
    assert!(xml.contains("INGESTED"));

    app.server.close().await.unwrap();
}

#[tokio::test]
async fn test_queue_runs_in_schedule_order() {
    let app = TestApp::new().await;
    let queue = app.server.queue();
    let now = Utc::now();

    queue
        .enqueue(
            titled_entity("ordered", "scheduled later"),
            now + chrono::Duration::milliseconds(150),
        )
        .unwrap();
    queue
        .enqueue(
            titled_entity("ordered", "scheduled earlier"),
            now + chrono::Duration::milliseconds(50),
        )
        .unwrap();

    let xml = wait_for(&app, "/entity/ordered")
        .await
        .expect("ordered entity was never ingested");
    assert!(xml.contains("scheduled earlier"), "{xml}");

    // The later entry conflicts under the default policy and is dropped.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let xml = app.request("GET", "/entity/ordered", None).await.text();
    assert!(xml.contains("scheduled earlier"), "{xml}");

    app.server.close().await.unwrap();
}

#[tokio::test]
async fn test_failed_queued_ingest_does_not_stop_the_queue() {
    let app = TestApp::new().await;
    let queue = app.server.queue();

    queue
        .enqueue_after(Bytes::from_static(b"<entity>"), Some(Duration::ZERO))
        .unwrap();
    queue
        .enqueue_after(Bytes::from(bare_entity_xml("after-failure")), Some(Duration::ZERO))
        .unwrap();

    assert!(wait_for(&app, "/entity/after-failure").await.is_some());
    app.server.close().await.unwrap();
}

#[tokio::test]
async fn test_close_discards_pending_and_refuses_new_work() {
    let app = TestApp::new().await;
    let queue = app.server.queue();

    queue
        .enqueue_after(
            Bytes::from(bare_entity_xml("never")),
            Some(Duration::from_secs(3600)),
        )
        .unwrap();

    app.server.close().await.unwrap();
    app.server.close().await.unwrap();

    assert!(queue.is_closed());
    let err = queue
        .enqueue_after(Bytes::from(bare_entity_xml("late")), None)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);

    let err = app.server.start().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
}

#[tokio::test]
async fn test_close_purges_storage() {
    let app = TestApp::new().await;
    let response = app.ingest(&bare_entity_xml("abc")).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let storage = app.server.storage();
    assert_eq!(storage.latest_document_version("abc").await.unwrap(), Some(1));

    app.server.close().await.unwrap();
    assert_eq!(storage.latest_document_version("abc").await.unwrap(), None);
}

#[tokio::test]
async fn test_ingest_is_indexed() {
    let app = TestApp::new().await;
    let response = app.ingest(&bare_entity_xml("indexed")).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let index = app.server.index();
    assert!(index.contains("indexed").await.unwrap());
    assert!(!index.contains("absent").await.unwrap());

    app.server.close().await.unwrap();
}
