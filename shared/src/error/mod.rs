//! Unified error system for the CraveBites backend
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and field errors
//! - [`ErrorResponse`]: JSON body sent to HTTP clients
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorResponse};
//!
//! let err = AppError::new(ErrorCode::OrderNotFound);
//! assert_eq!(err.message, "Order not found");
//!
//! let err = AppError::validation_errors(vec!["Quantity must be at least 1".into()]);
//! let body = ErrorResponse::sanitized(&err);
//! assert_eq!(body.message, "Validation Error");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{
    AppError, AppResult, ErrorDetail, ErrorResponse, SANITIZED_CAUSE, SANITIZED_MESSAGE,
};
