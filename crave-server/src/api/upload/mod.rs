//! Upload Routes
//!
//! Image upload to the media host. The returned URL is stored on products
//! and categories by the client.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/upload", post(handler::upload))
}
