//! Local storage for uploaded receipt files.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Public URL prefix the upload directory is served under.
pub const UPLOADS_PREFIX: &str = "/uploads";

const ALLOWED_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("application/pdf", "pdf"),
];

pub struct ReceiptStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl ReceiptStore {
    pub fn new(dir: PathBuf, max_bytes: usize) -> Self {
        Self { dir, max_bytes }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// File extension for an accepted content type.
    pub fn extension_for(content_type: &str) -> Option<&'static str> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        ALLOWED_TYPES
            .iter()
            .find(|(allowed, _)| *allowed == essence)
            .map(|(_, ext)| *ext)
    }

    /// Writes the file under a generated name and returns its public URL.
    pub async fn save(&self, content_type: &str, bytes: &[u8]) -> ApiResult<String> {
        let extension = Self::extension_for(content_type).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Unsupported receipt type '{}'; expected JPEG, PNG, WebP or PDF",
                content_type
            ))
        })?;
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "Receipt exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to create upload directory: {e}")))?;
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.dir.join(&name), bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store receipt: {e}")))?;

        tracing::info!("Stored receipt {} ({} bytes)", name, bytes.len());
        Ok(format!("{}/{}", UPLOADS_PREFIX, name))
    }
}
