//! Image hosting
//!
//! Uploads go to Cloudinary with a signed request. The signature is the
//! SHA-256 hex digest of the sorted signed parameters followed by the API
//! secret. Credentials come from [`MediaConfig`]; nothing is read from the
//! environment at upload time.

use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult, ErrorCode};

/// Default upload size limit (5MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const DEFAULT_FOLDER: &str = "cravebites";

/// Media host settings
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub folder: String,
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            folder: DEFAULT_FOLDER.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl MediaConfig {
    /// Load from `CLOUDINARY_*` and `MAX_UPLOAD_BYTES`
    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            cloud_name: non_empty("CLOUDINARY_CLOUD_NAME"),
            api_key: non_empty("CLOUDINARY_API_KEY"),
            api_secret: non_empty("CLOUDINARY_API_SECRET"),
            folder: non_empty("CLOUDINARY_FOLDER").unwrap_or_else(|| DEFAULT_FOLDER.into()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.cloud_name.is_some() && self.api_key.is_some() && self.api_secret.is_some()
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
    pub url: String,
    pub public_id: String,
}

/// Image host
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> AppResult<UploadedMedia>;
}

/// Cloudinary upload API client
pub struct CloudinaryUploader {
    config: MediaConfig,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    public_id: String,
}

#[derive(Deserialize)]
struct UploadErrorBody {
    error: UploadErrorMessage,
}

#[derive(Deserialize)]
struct UploadErrorMessage {
    message: String,
}

impl CloudinaryUploader {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }
}

/// Signature over `params` (sorted by key) and the API secret
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn data_uri(bytes: &[u8], content_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        content_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[async_trait]
impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> AppResult<UploadedMedia> {
        let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            self.config.cloud_name.as_deref(),
            self.config.api_key.as_deref(),
            self.config.api_secret.as_deref(),
        ) else {
            return Err(AppError::new(ErrorCode::UploadNotConfigured));
        };

        let timestamp = Utc::now().timestamp().to_string();
        let folder = self.config.folder.as_str();
        let signature = sign_params(&[("folder", folder), ("timestamp", &timestamp)], api_secret);
        let file = data_uri(&bytes, content_type);

        let resp = self
            .client
            .post(format!(
                "https://api.cloudinary.com/v1_1/{cloud_name}/image/upload"
            ))
            .form(&[
                ("file", file.as_str()),
                ("folder", folder),
                ("timestamp", timestamp.as_str()),
                ("api_key", api_key),
                ("signature", signature.as_str()),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(ErrorCode::UploadFailed, format!("Media host unreachable: {e}"))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<UploadErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_default();
            tracing::warn!(%status, %message, "Image upload rejected");
            return Err(AppError::with_message(
                ErrorCode::UploadFailed,
                format!("Image upload failed: {status} {message}"),
            ));
        }

        let body: UploadResponse = resp.json().await.map_err(|e| {
            AppError::with_message(ErrorCode::UploadFailed, format!("Invalid upload response: {e}"))
        })?;
        let url = body
            .secure_url
            .or(body.url)
            .ok_or_else(|| AppError::with_message(ErrorCode::UploadFailed, "Upload response has no URL"))?;

        tracing::info!(public_id = %body.public_id, size = bytes.len(), "Image uploaded");
        Ok(UploadedMedia {
            url,
            public_id: body.public_id,
        })
    }
}
