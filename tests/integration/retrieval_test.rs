//! Integration tests for entity, representation, and file retrieval.

mod helpers;

use http::StatusCode;

use helpers::{PUBLIC_URL, TestApp, entity_xml};

async fn seeded() -> TestApp {
    let app = TestApp::new().await;
    let page = app.source_file("page-1.tif", b"page one bytes");
    let response = app
        .ingest(&entity_xml(
            "report-2024",
            "original",
            &[("page-1", &page, Some("image/tiff"))],
        ))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    app
}

#[tokio::test]
async fn test_get_entity_returns_stored_document() {
    let app = seeded().await;

    let first = app.request("GET", "/entity/report-2024", None).await;
    let second = app.request("GET", "/entity/report-2024", None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);

    let xml = first.text();
    assert!(xml.starts_with("<?xml"), "{xml}");
    assert!(xml.contains(r#"<element name="title">Test entity report-2024</element>"#));
}

#[tokio::test]
async fn test_get_representation() {
    let app = seeded().await;

    let response = app
        .request("GET", "/representation/report-2024/original", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("application/xml"));

    let xml = response.text();
    assert!(xml.contains("<representation>"), "{xml}");
    assert!(xml.contains("<identifier>original</identifier>"));
    assert!(xml.contains("<title>Original scans</title>"));
    assert!(xml.contains(&format!(
        "<uri>{PUBLIC_URL}/file/report-2024/original/page-1</uri>"
    )));
    assert!(!xml.contains("<entity>"));
}

#[tokio::test]
async fn test_get_file() {
    let app = seeded().await;

    let response = app
        .request("GET", "/file/report-2024/original/page-1", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("image/tiff"));
    assert_eq!(&response.body[..], b"page one bytes");
}

#[tokio::test]
async fn test_missing_resources_are_not_found() {
    let app = seeded().await;

    let paths = [
        "/entity/unknown",
        "/representation/unknown/original",
        "/representation/report-2024/derived",
        "/file/unknown/original/page-1",
        "/file/report-2024/derived/page-1",
        "/file/report-2024/original/page-9",
    ];
    for path in paths {
        let response = app.request("GET", path, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(response.error_code().as_deref(), Some("NOT_FOUND"), "{path}");
    }
}

#[tokio::test]
async fn test_nothing_survives_restart() {
    let app = seeded().await;
    app.server.close().await.unwrap();

    let fresh = TestApp::new().await;
    let response = fresh.request("GET", "/entity/report-2024", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_identifiers_needing_escapes_round_trip() {
    let app = TestApp::new().await;
    let scan = app.source_file("scan.bin", b"scan bytes");

    let response = app
        .ingest(&entity_xml("a b", "caf\u{e9}", &[("50%", &scan, None)]))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    assert_eq!(response.text(), "a b");

    let entity = app.request("GET", "/entity/a%20b", None).await;
    assert_eq!(entity.status, StatusCode::OK);
    let xml = entity.text();
    assert!(xml.contains("<identifier>a b</identifier>"), "{xml}");
    assert!(
        xml.contains(&format!("<uri>{PUBLIC_URL}/file/a%20b/caf%C3%A9/50%25</uri>")),
        "{xml}"
    );

    let representation = app
        .request("GET", "/representation/a%20b/caf%C3%A9", None)
        .await;
    assert_eq!(representation.status, StatusCode::OK);

    let file = app.request("GET", "/file/a%20b/caf%C3%A9/50%25", None).await;
    assert_eq!(file.status, StatusCode::OK);
    assert_eq!(&file.body[..], b"scan bytes");
}
