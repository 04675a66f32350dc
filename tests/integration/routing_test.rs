//! Integration tests for routes outside the implemented surface.

mod helpers;

use bytes::Bytes;
use http::StatusCode;

use helpers::{TestApp, bare_entity_xml};

#[tokio::test]
async fn test_reserved_routes_are_not_found() {
    let app = TestApp::new().await;
    let body = || Some(Bytes::from(bare_entity_xml("abc")));

    let cases = [
        ("POST", "/entity-async", body()),
        ("POST", "/entity-list", body()),
        ("GET", "/metadata/abc", None),
        ("GET", "/entity-version-list/abc", None),
        ("GET", "/sru/entities?query=title", None),
        ("GET", "/sru/representations?query=title", None),
        ("GET", "/bitstream/abc", None),
        ("GET", "/lifecycle/abc", None),
        ("PUT", "/entity/abc", body()),
        ("PUT", "/representation/abc/original", body()),
        ("PUT", "/metadata/abc", body()),
        ("DELETE", "/entity/abc", None),
    ];
    for (method, path, body) in cases {
        let response = app.request(method, path, body).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {path}");
        assert_eq!(
            response.error_code().as_deref(),
            Some("NOT_FOUND"),
            "{method} {path}"
        );
    }
}

#[tokio::test]
async fn test_async_path_does_not_ingest() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/entity-async", Some(Bytes::from(bare_entity_xml("abc"))))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("GET", "/entity/abc", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_routes_are_not_found() {
    let app = TestApp::new().await;

    let cases = [
        ("GET", "/"),
        ("GET", "/entity"),
        ("GET", "/entity/a/b"),
        ("GET", "/file/abc/original"),
        ("POST", "/somewhere"),
        ("PATCH", "/entity/abc"),
        ("OPTIONS", "/entity"),
    ];
    for (method, path) in cases {
        let response = app.request(method, path, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {path}");
    }
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = helpers::test_config(Default::default());
    config.server.max_body_bytes = 64;
    let app = TestApp::with_config(config).await;

    let response = app.ingest(&bare_entity_xml(&"x".repeat(200))).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
}
