//! API request/response types

use serde::{Deserialize, Serialize};

/// Body of `GET /`
pub const GREETING: &str = "House Price Prediction API is Running!";

/// Successful `POST /predict` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Model output for the submitted house
    pub predicted_price: f64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Loaded model family
    pub model_kind: String,
    /// Feature vector width
    pub n_features: usize,
    /// Number of category indicator columns
    pub indicators: usize,
}
