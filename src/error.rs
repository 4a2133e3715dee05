//! Error types for artifact loading and price estimation
//!
//! Every stage of a request (decode, encode, predict) returns
//! [`PredictError`]. The HTTP boundary collapses all of them into the same
//! external shape and uses [`PredictError::stage`] for log detail only.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for house price operations
pub type Result<T> = std::result::Result<T, PredictError>;

/// Errors raised while loading artifacts or serving a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    /// Artifact file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON of the expected shape
    #[error("Failed to parse {path}: {reason}")]
    ArtifactParse {
        /// Path of the artifact
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Feature schema is unusable
    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    /// Model artifact is internally inconsistent
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Request body is not a JSON object
    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    /// Required request field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Request field has an unusable value
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField {
        /// Request key
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Feature width does not match what the model expects
    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch {
        /// Width the model was trained on
        expected: usize,
        /// Width that was supplied
        actual: usize,
    },

    /// Model evaluation failed
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Server could not bind or stopped with an error
    #[error("Server error: {0}")]
    Server(String),
}

impl PredictError {
    /// Pipeline stage the error originated in
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Io { .. }
            | Self::ArtifactParse { .. }
            | Self::InvalidSchema(_)
            | Self::InvalidModel(_) => "load",
            Self::InvalidPayload(_) => "decode",
            Self::MissingField(_) | Self::InvalidField { .. } => "encode",
            Self::ShapeMismatch { .. } | Self::Inference(_) => "predict",
            Self::Server(_) => "serve",
        }
    }

    /// Build an [`PredictError::InvalidField`]
    pub(crate) fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
