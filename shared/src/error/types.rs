//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Generic message sent in place of system error causes
pub const SANITIZED_MESSAGE: &str = "Server Error";
/// Generic cause sent in place of system error causes
pub const SANITIZED_CAUSE: &str = "Something went wrong";

/// Application error with structured error code and details
///
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Field-level messages for validation failures
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Field-level messages (validation failures)
    pub errors: Vec<String>,
    /// Optional additional details (context, offending values, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            errors: Vec::new(),
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error carrying a single field message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_errors(vec![msg.into()])
    }

    /// Create a validation error from collected field messages
    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: ErrorCode::ValidationFailed.message().to_string(),
            errors,
            details: None,
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an upstream (collaborator) failure
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::UpstreamFailure, msg)
    }

    /// Create an illegal-state error (unknown enum value)
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::OrderInvalidStatus, msg)
    }
}

/// Error body returned to HTTP clients
///
/// `errors` is only present for validation failures; `error` carries the
/// (possibly sanitized) cause of system failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ErrorResponse {
    /// Body as seen by clients in production
    pub fn sanitized(err: &AppError) -> Self {
        if err.code.is_sensitive() {
            return Self {
                code: err.code.code(),
                message: SANITIZED_MESSAGE.to_string(),
                errors: Vec::new(),
                error: Some(SANITIZED_CAUSE.to_string()),
                details: None,
            };
        }
        Self::unsanitized(err)
    }

    /// Body including the raw cause (development mode)
    pub fn unsanitized(err: &AppError) -> Self {
        if err.code.is_sensitive() {
            return Self {
                code: err.code.code(),
                message: SANITIZED_MESSAGE.to_string(),
                errors: Vec::new(),
                error: Some(err.message.clone()),
                details: err.details.clone(),
            };
        }
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            errors: err.errors.clone(),
            error: None,
            details: err.details.clone(),
        }
    }
}

/// Unsanitized body attached to error responses as a response extension
///
/// A development-only middleware swaps it in for the sanitized body.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub ErrorResponse);

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorResponse::sanitized(&self);

        // Log system errors
        if self.code.is_sensitive() {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        let mut response = (status, Json(body)).into_response();
        response
            .extensions_mut()
            .insert(ErrorDetail(ErrorResponse::unsanitized(&self)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.errors.is_empty());
        assert!(err.details.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let err = AppError::validation_errors(vec![
            "Order items are required".into(),
            "CGST and SGST are required".into(),
        ]);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Validation Error");
        assert_eq!(err.errors.len(), 2);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::invalid_state("Invalid status")
            .with_detail("status", "shipped");

        assert_eq!(err.code, ErrorCode::OrderInvalidStatus);
        let body = ErrorResponse::sanitized(&err);
        assert_eq!(body.details.unwrap().get("status").unwrap(), "shipped");
        assert!(body.errors.is_empty());
    }

    #[test]
    fn test_convenience_constructors() {
        let err = AppError::invalid_state("Invalid status: shipped");
        assert_eq!(err.message, "Invalid status: shipped");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);

        let err = AppError::upstream("media host returned 503");
        assert_eq!(err.code, ErrorCode::UpstreamFailure);

        let err = AppError::database("disk full");
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_sanitized_body_hides_system_cause() {
        let err = AppError::database("table 'orders' is corrupted");
        let body = ErrorResponse::sanitized(&err);
        assert_eq!(body.message, SANITIZED_MESSAGE);
        assert_eq!(body.error.as_deref(), Some(SANITIZED_CAUSE));

        let body = ErrorResponse::unsanitized(&err);
        assert_eq!(body.error.as_deref(), Some("table 'orders' is corrupted"));
    }

    #[test]
    fn test_validation_body_shape() {
        let err = AppError::validation("Quantity must be at least 1");
        let json = serde_json::to_value(ErrorResponse::sanitized(&err)).unwrap();
        assert_eq!(json["message"], "Validation Error");
        assert_eq!(json["errors"][0], "Quantity must be at least 1");
        assert!(json.get("error").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_into_response_status_and_extension() {
        use axum::response::IntoResponse;

        let response = AppError::upstream("cloudinary timeout").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert_eq!(detail.0.error.as_deref(), Some("cloudinary timeout"));
    }
}
