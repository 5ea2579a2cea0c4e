use crate::core::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::json;
use shared::error::{AppError, ErrorCode, ErrorDetail};
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

/// Multipart framing allowance on top of the upload size limit
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Access log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Development only: replace sanitized error bodies with the raw cause
async fn expose_error_detail(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<ErrorDetail>() {
        Some(ErrorDetail(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "CraveBites API is running" }))
}

async fn route_not_found() -> AppError {
    AppError::new(ErrorCode::RouteNotFound)
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::upload::router())
        .merge(crate::api::categories::router())
        .merge(crate::api::products::router())
        .merge(crate::api::orders::router())
}

/// Full application: routes, state and the middleware stack
pub fn build_router(state: ServerState) -> Router {
    let config = state.config.clone();

    let mut app = build_app();
    if !config.is_production() {
        app = app.route("/", get(root));
    }

    let mut app = app
        .fallback(route_not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(
            config.media.max_upload_bytes + BODY_LIMIT_OVERHEAD,
        ))
        .layer(TimeoutLayer::new(Duration::from_millis(
            config.request_timeout_ms,
        )))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new());

    if config.is_development() {
        app = app.layer(middleware::from_fn(expose_error_detail));
    }

    // Access log
    app.layer(middleware::from_fn(log_request))
}
