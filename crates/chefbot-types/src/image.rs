//! Image-generation request/response types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Request for a single generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Short text prompt, usually the user's original turn prompt.
    pub prompt: String,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// A generated image stored on the local filesystem.
///
/// The file is owned by the caller; it is not deleted when this value drops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub path: PathBuf,
}

/// Errors from image provider operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImageError {
    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("image request failed: {0}")]
    Request(String),

    #[error("image service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("image response contained no artifacts")]
    EmptyResponse,

    #[error("failed to decode image payload: {0}")]
    Decode(String),

    #[error("failed to store image: {0}")]
    Storage(String),
}
