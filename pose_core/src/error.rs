//! Error taxonomy of the inference pipeline.
//!
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoseError {
    /// The model file is missing or could not be turned into a runnable plan.
    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Image data not found")]
    MissingInput,

    #[error("Image could not be decoded: {0}")]
    ImageDecode(String),

    #[error("Prediction failed: {0}")]
    Inference(String),
}

impl PoseError {
    /// Whether the caller sent something unusable, as opposed to a failure on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PoseError::MissingInput | PoseError::ImageDecode(_))
    }
}

impl From<base64::DecodeError> for PoseError {
    fn from(err: base64::DecodeError) -> Self {
        PoseError::ImageDecode(err.to_string())
    }
}

impl From<image::ImageError> for PoseError {
    fn from(err: image::ImageError) -> Self {
        PoseError::ImageDecode(err.to_string())
    }
}
