//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    ///
    /// Uniqueness violations are reported as 400, the same as any other
    /// rejected payload.
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RouteNotFound
            | Self::OrderNotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound => StatusCode::NOT_FOUND,

            // 408 Request Timeout
            Self::TimeoutError => StatusCode::REQUEST_TIMEOUT,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::UpstreamFailure
            | Self::UploadFailed
            | Self::UploadNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, duplicates, illegal enum values)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
