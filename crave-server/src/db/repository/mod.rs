//! Repository Module
//!
//! Typed access to the document tables. Each repository owns the
//! uniqueness and referential rules of its collection.

pub mod category;
pub mod order;
pub mod product;

// Re-exports
pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use super::StorageError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<StorageError> for RepoError {
    fn from(err: StorageError) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    /// Convert to an API error with resource-specific codes
    pub fn into_app_error(self, not_found: ErrorCode, duplicate: ErrorCode) -> AppError {
        match self {
            RepoError::NotFound(_) => AppError::new(not_found),
            RepoError::Duplicate(msg) => AppError::with_message(duplicate, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        err.into_app_error(ErrorCode::NotFound, ErrorCode::AlreadyExists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_repo_error_mapping() {
        let err = RepoError::NotFound("Order".into())
            .into_app_error(ErrorCode::OrderNotFound, ErrorCode::OrderNumberConflict);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");

        let err = RepoError::Duplicate("Category with this name already exists".into())
            .into_app_error(ErrorCode::CategoryNotFound, ErrorCode::CategoryNameExists);
        assert_eq!(err.code, ErrorCode::CategoryNameExists);

        let err: AppError = RepoError::Duplicate("Category name exists".into()).into();
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);

        let err: AppError = RepoError::Database("io".into()).into();
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
