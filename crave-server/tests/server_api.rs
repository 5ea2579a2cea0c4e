//! Health, fallback, upload and error sanitization

mod common;

use std::sync::Arc;

use common::{FailingUploader, MockUploader, multipart_request, send, send_raw, test_app, test_state_with};
use crave_server::build_router;
use http::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_outside_production_only() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "CraveBites API is running");

    let production = build_router(test_state_with("production", Arc::new(MockUploader)));
    let (status, body) = send(&production, "GET", "/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_upload_image() {
    let app = test_app();
    let (status, body) = send_raw(&app, multipart_request("image", "image/png", b"\x89PNG....")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://cdn.test/cravebites/8.png");
    assert_eq!(body["publicId"], "cravebites/mock");
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = test_app();

    let (status, body) = send_raw(&app, multipart_request("file", "image/png", b"abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");

    let (status, body) = send_raw(&app, multipart_request("image", "application/pdf", b"%PDF")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only image files are allowed");

    // Test config limits uploads to 1KB
    let (status, body) = send_raw(&app, multipart_request("image", "image/jpeg", &[7u8; 2048])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File too large. Maximum size is 1024 bytes");
}

#[tokio::test]
async fn test_upstream_failure_is_sanitized() {
    let app = build_router(test_state_with("production", Arc::new(FailingUploader)));
    let (status, body) = send_raw(&app, multipart_request("image", "image/png", b"png")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server Error");
    assert_eq!(body["error"], "Something went wrong");
}

#[tokio::test]
async fn test_upstream_failure_detail_in_development() {
    let app = build_router(test_state_with("development", Arc::new(FailingUploader)));
    let (status, body) = send_raw(&app, multipart_request("image", "image/png", b"png")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Server Error");
    assert_eq!(body["error"], "media host returned 503");
}
