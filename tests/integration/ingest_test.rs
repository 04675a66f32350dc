//! Integration tests for synchronous ingest over HTTP.

mod helpers;

use http::StatusCode;

use dorepo_core::config::ReingestPolicy;
use helpers::{PUBLIC_URL, TestApp, bare_entity_xml, entity_xml};

#[tokio::test]
async fn test_ingest_then_get_entity() {
    let app = TestApp::new().await;

    let response = app.ingest(&bare_entity_xml("abc")).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.text(), "abc");

    let response = app.request("GET", "/entity/abc", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("application/xml"));

    let xml = response.text();
    assert!(xml.contains("<identifier>abc</identifier>"), "{xml}");
    assert!(xml.contains("INGESTED"), "{xml}");
}

#[tokio::test]
async fn test_ingest_rewrites_file_uris_and_stores_binaries() {
    let app = TestApp::new().await;
    let page = app.source_file("page-1.tif", b"TIFF page one");
    let notes = app.source_file("notes.txt", b"reviewer notes");

    let xml = entity_xml(
        "abc",
        "original",
        &[
            ("page-1", &page, Some("image/tiff")),
            ("notes", &notes, None),
        ],
    );
    let response = app.ingest(&xml).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());

    let stored = app.request("GET", "/entity/abc", None).await.text();
    assert!(stored.contains(&format!("<uri>{PUBLIC_URL}/file/abc/original/page-1</uri>")));
    assert!(stored.contains(&format!("<uri>{PUBLIC_URL}/file/abc/original/notes</uri>")));
    assert!(!stored.contains("file://"), "{stored}");

    let page = app.request("GET", "/file/abc/original/page-1", None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.content_type.as_deref(), Some("image/tiff"));
    assert_eq!(&page.body[..], b"TIFF page one");

    let notes = app.request("GET", "/file/abc/original/notes", None).await;
    assert_eq!(notes.status, StatusCode::OK);
    assert_eq!(notes.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(&notes.body[..], b"reviewer notes");
}

#[tokio::test]
async fn test_malformed_document_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.ingest("<entity><identifier>abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code().as_deref(), Some("MALFORMED_INPUT"));

    let response = app.request("GET", "/entity/abc", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_identifiers_are_rejected() {
    let app = TestApp::new().await;

    let response = app.ingest(&bare_entity_xml("..")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code().as_deref(), Some("VALIDATION_ERROR"));

    let source = app.source_file("a.bin", b"a");
    let response = app
        .ingest(&entity_xml("abc", "rep/one", &[("f1", &source, None)]))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code().as_deref(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_unsupported_scheme_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .ingest(&entity_xml(
            "abc",
            "original",
            &[("f1", "ftp://example.org/f1.bin", None)],
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code().as_deref(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_unreachable_source_leaves_nothing_behind() {
    let app = TestApp::new().await;
    let present = app.source_file("present.bin", b"present");
    let missing = app.missing_source("missing.bin");

    let response = app
        .ingest(&entity_xml(
            "abc",
            "original",
            &[("f1", &present, None), ("f2", &missing, None)],
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.error_code().as_deref(),
        Some("UPSTREAM_FETCH_FAILED")
    );

    for path in ["/entity/abc", "/file/abc/original/f1", "/file/abc/original/f2"] {
        let response = app.request("GET", path, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_reingest_is_rejected_by_default() {
    let app = TestApp::new().await;

    let first = app.ingest(&bare_entity_xml("abc")).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.ingest(&bare_entity_xml("abc")).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error_code().as_deref(), Some("CONFLICT"));

    let response = app.request("GET", "/entity/abc", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_reingest_as_new_version() {
    let app = TestApp::with_policy(ReingestPolicy::NewVersion).await;

    let first = app.ingest(&bare_entity_xml("abc")).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let second = app.ingest(&bare_entity_xml("abc")).await;
    assert_eq!(second.status, StatusCode::CREATED);

    let xml = app.request("GET", "/entity/abc", None).await.text();
    assert!(xml.contains("<version>2</version>"), "{xml}");
}

#[tokio::test]
async fn test_reingest_with_overwrite() {
    let app = TestApp::with_policy(ReingestPolicy::Overwrite).await;
    let first_source = app.source_file("v1.bin", b"first");
    let second_source = app.source_file("v2.bin", b"second");

    let first = app
        .ingest(&entity_xml("abc", "original", &[("f1", &first_source, None)]))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    let second = app
        .ingest(&entity_xml("abc", "original", &[("f1", &second_source, None)]))
        .await;
    assert_eq!(second.status, StatusCode::CREATED);

    let xml = app.request("GET", "/entity/abc", None).await.text();
    assert!(xml.contains("<version>1</version>"), "{xml}");

    let file = app.request("GET", "/file/abc/original/f1", None).await;
    assert_eq!(&file.body[..], b"second");
}

#[tokio::test]
async fn test_entity_without_representations_round_trips() {
    let app = TestApp::new().await;
    let xml = r#"<entity>
  <identifier>plain</identifier>
  <descriptive type="dc"><element name="title">Loose leaf</element><element name="creator">Registry</element></descriptive>
</entity>"#;

    let response = app.ingest(xml).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let stored = app.request("GET", "/entity/plain", None).await.text();
    assert!(stored.contains("<identifier>plain</identifier>"), "{stored}");
    assert!(stored.contains(r#"<descriptive type="dc">"#), "{stored}");
    assert!(stored.contains(r#"<element name="title">Loose leaf</element>"#));
    assert!(stored.contains(r#"<element name="creator">Registry</element>"#));
    assert!(!stored.contains("<representation>"));
}

#[tokio::test]
async fn test_failed_overwrite_keeps_earlier_files_served() {
    let app = TestApp::with_policy(ReingestPolicy::Overwrite).await;
    let page = app.source_file("page.bin", b"page");
    let missing = app.missing_source("gone.bin");

    let first = app
        .ingest(&entity_xml("abc", "original", &[("f1", &page, None)]))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .ingest(&entity_xml(
            "abc",
            "original",
            &[("f1", &page, None), ("f2", &missing, None)],
        ))
        .await;
    assert_eq!(second.status, StatusCode::BAD_GATEWAY);

    let xml = app.request("GET", "/entity/abc", None).await.text();
    assert!(xml.contains(&format!("<uri>{PUBLIC_URL}/file/abc/original/f1</uri>")));

    let file = app.request("GET", "/file/abc/original/f1", None).await;
    assert_eq!(file.status, StatusCode::OK);
    assert_eq!(&file.body[..], b"page");
}
