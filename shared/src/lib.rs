//! Shared types for the CraveBites backend
//!
//! Error types, wire models and id helpers used by the server and its
//! integration tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
