//! Image Upload Handler
//!
//! Accepts a multipart form with an `image` field and forwards the bytes to
//! the configured media host.

use axum::Json;
use axum::extract::{Multipart, State};
use http::StatusCode;

use crate::core::ServerState;
use crate::services::UploadedMedia;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Multipart field carrying the file
const FILE_FIELD: &str = "image";

fn too_large(limit: usize) -> AppError {
    AppError::with_message(
        ErrorCode::FileTooLarge,
        format!("File too large. Maximum size is {limit} bytes"),
    )
}

/// Validate type and size before anything leaves the server
fn validate_image(data: &[u8], content_type: &str, limit: usize) -> AppResult<()> {
    if !content_type.starts_with("image/") {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat));
    }
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > limit {
        return Err(too_large(limit));
    }
    Ok(())
}

/// POST /api/upload
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadedMedia>> {
    let limit = state.config.media.max_upload_bytes;
    let mut file: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                too_large(limit)
            } else {
                AppError::validation(format!("Multipart error: {}", e))
            }
        })?;
        file = Some((data.to_vec(), content_type));
        break;
    }

    let (data, content_type) = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    validate_image(&data, &content_type, limit)?;

    let uploaded = state.media.upload(data, &content_type).await?;
    Ok(Json(uploaded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image() {
        assert!(validate_image(b"png", "image/png", 10).is_ok());
        assert_eq!(
            validate_image(b"pdf", "application/pdf", 10).unwrap_err().code,
            ErrorCode::UnsupportedFileFormat
        );
        assert_eq!(
            validate_image(b"", "image/png", 10).unwrap_err().code,
            ErrorCode::EmptyFile
        );
        let err = validate_image(&[0u8; 11], "image/jpeg", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }
}
