//! Shared helpers for the HTTP integration tests
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`
//! against an in-memory redb database.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use crave_server::db::DbService;
use crave_server::services::{MediaUploader, UploadedMedia};
use crave_server::{AppError, AppResult, Config, ServerState, build_router};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct MockUploader;

#[async_trait]
impl MediaUploader for MockUploader {
    async fn upload(&self, bytes: Vec<u8>, _content_type: &str) -> AppResult<UploadedMedia> {
        Ok(UploadedMedia {
            url: format!("https://cdn.test/cravebites/{}.png", bytes.len()),
            public_id: "cravebites/mock".into(),
        })
    }
}

pub struct FailingUploader;

#[async_trait]
impl MediaUploader for FailingUploader {
    async fn upload(&self, _bytes: Vec<u8>, _content_type: &str) -> AppResult<UploadedMedia> {
        Err(AppError::upstream("media host returned 503"))
    }
}

pub fn test_config(environment: &str) -> Config {
    let mut config = Config::with_overrides("./target/test-data", 0);
    config.environment = environment.into();
    config.timezone = chrono_tz::UTC;
    config.request_timeout_ms = 30_000;
    config.media.max_upload_bytes = 1024;
    config
}

pub fn test_state_with(environment: &str, media: Arc<dyn MediaUploader>) -> ServerState {
    let db = DbService::open_in_memory().expect("in-memory database");
    ServerState::with_parts(test_config(environment), db, media)
}

pub fn test_app() -> Router {
    build_router(test_state_with("test", Arc::new(MockUploader)))
}

/// Send a request and decode the JSON response body (Null when empty)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    into_json(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

async fn into_json(response: http::Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

/// A valid order payload with one ad-hoc item
pub fn order_payload(product_ref: &str, quantity: u32, price: f64) -> Value {
    let subtotal = price * f64::from(quantity);
    json!({
        "customer": { "name": "Asha", "phone": "9876543210" },
        "orderItems": [{
            "productRef": product_ref,
            "name": "Masala Dosa",
            "quantity": quantity,
            "price": price
        }],
        "paymentMethod": "cash",
        "subtotal": subtotal,
        "cgst": 2.5,
        "sgst": 2.5,
        "deliveryCharge": 0,
        "totalAmount": subtotal + 5.0
    })
}

/// Multipart body with a single file field
pub fn multipart_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    const BOUNDARY: &str = "crave-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"dish.png\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
