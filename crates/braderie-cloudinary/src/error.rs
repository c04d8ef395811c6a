//! Cloudinary error types.

use thiserror::Error;

/// Result type for image hosting operations.
pub type CloudinaryResult<T> = Result<T, CloudinaryError>;

/// Errors that can occur while talking to the image host.
#[derive(Debug, Error)]
pub enum CloudinaryError {
    #[error("Failed to configure image host client: {0}")]
    Config(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Destroy failed: {0}")]
    DestroyFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl CloudinaryError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }
}
