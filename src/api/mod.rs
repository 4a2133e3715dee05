//! HTTP API for house price prediction
//!
//! ## Endpoints
//!
//! - `GET /` - Liveness greeting (plain text)
//! - `GET /health` - Model and schema summary
//! - `POST /predict` - Estimate a price from house attributes
//!
//! Every `/predict` failure, including an unparseable body, is answered
//! with `500` and `{"error": "..."}`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use house_price::api::{create_router, AppState};
//!
//! let state = AppState::new(estimator);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::{
    error::{PredictError, Result},
    estimator::PriceEstimator,
};

mod types;

pub use types::{ErrorResponse, HealthResponse, PredictResponse, GREETING};

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded schema and model
    estimator: PriceEstimator,
    /// Allow requests from any origin
    cors: bool,
}

impl AppState {
    /// Create state around a loaded estimator, with CORS enabled
    #[must_use]
    pub fn new(estimator: PriceEstimator) -> Self {
        Self {
            estimator,
            cors: true,
        }
    }

    /// Enable or disable the any-origin CORS policy
    #[must_use]
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Loaded estimator
    #[must_use]
    pub fn estimator(&self) -> &PriceEstimator {
        &self.estimator
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = state.cors;
    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn root_handler() -> &'static str {
    GREETING
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let estimator = state.estimator();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        model_kind: estimator.predictor().kind().to_string(),
        n_features: estimator.schema().len(),
        indicators: estimator.schema().indicator_count(),
    })
}

/// Prediction handler (/predict)
///
/// Takes the raw body, and its rejection, so that oversized bodies and JSON
/// decode failures are reported the same way as encoding and model failures.
async fn predict_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> std::result::Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let start = Instant::now();

    let result = body
        .map_err(|e| PredictError::InvalidPayload(e.body_text()))
        .and_then(|body| predict(&state, &body));

    match result {
        Ok(predicted_price) => {
            tracing::info!(
                predicted_price,
                latency_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Prediction served"
            );
            Ok(Json(PredictResponse { predicted_price }))
        },
        Err(e) => {
            tracing::warn!(stage = e.stage(), error = %e, "Prediction failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        },
    }
}

fn predict(state: &AppState, body: &[u8]) -> Result<f64> {
    let payload: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| PredictError::InvalidPayload(e.to_string()))?;
    tracing::debug!(%payload, "Received prediction request");

    let estimate = state.estimator.estimate(&payload)?;
    Ok(estimate.predicted_price)
}

// Test helpers module (compiled only in tests)
#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
mod tests;
