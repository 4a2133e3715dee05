//! Price estimation pipeline: encode → predict → first row
//!
//! [`PriceEstimator`] owns the immutable schema and model pair. It is built
//! once at startup and shared by the HTTP handlers and the CLI.

use std::{path::PathBuf, sync::Arc};

use serde::Serialize;
use serde_json::Value;

use crate::{
    encoder::{self, FeatureVector},
    error::{PredictError, Result},
    model::{self, Predictor},
    schema::{FeatureSchema, NumericColumns},
};

/// Locations of the two training artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Model artifact (JSON)
    pub model: PathBuf,
    /// Column list (JSON array of strings)
    pub columns: PathBuf,
}

/// Result of one estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// Model output for the request
    pub predicted_price: f64,
    /// Vector the model was evaluated on
    pub features: FeatureVector,
}

/// Schema and model loaded together
#[derive(Clone)]
pub struct PriceEstimator {
    schema: Arc<FeatureSchema>,
    predictor: Arc<dyn Predictor>,
}

impl std::fmt::Debug for PriceEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceEstimator")
            .field("n_features", &self.schema.len())
            .field("indicators", &self.schema.indicator_count())
            .field("model_kind", &self.predictor.kind())
            .finish()
    }
}

impl PriceEstimator {
    /// Pair a schema with a model
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ShapeMismatch`] if the schema width differs
    /// from the model's input width.
    pub fn new(schema: FeatureSchema, predictor: Arc<dyn Predictor>) -> Result<Self> {
        if schema.len() != predictor.n_features() {
            return Err(PredictError::ShapeMismatch {
                expected: predictor.n_features(),
                actual: schema.len(),
            });
        }
        Ok(Self {
            schema: Arc::new(schema),
            predictor,
        })
    }

    /// Load both artifacts from disk
    ///
    /// # Errors
    ///
    /// Fails if either artifact is unreadable or invalid, or if they
    /// disagree on feature width.
    pub fn load(paths: &ArtifactPaths, numeric_columns: &NumericColumns) -> Result<Self> {
        let schema = FeatureSchema::load(&paths.columns, numeric_columns)?;
        let predictor = model::load_model(&paths.model)?;
        Self::new(schema, predictor)
    }

    /// Feature schema in use
    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Model in use
    #[must_use]
    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    /// Estimate the price for a JSON request payload
    ///
    /// # Errors
    ///
    /// Returns the encoding error for malformed payloads, or an inference
    /// error if the model produces no finite output.
    pub fn estimate(&self, payload: &Value) -> Result<Estimate> {
        let features = encoder::encode(&self.schema, payload)?;
        tracing::debug!(features = ?features.as_slice(), "Encoded features");

        let batch = [features];
        let predicted_price = self
            .predictor
            .predict(&batch)?
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference("model returned no predictions".to_string()))?;

        if !predicted_price.is_finite() {
            return Err(PredictError::Inference(format!(
                "model produced a non-finite value ({predicted_price})"
            )));
        }

        let [features] = batch;
        Ok(Estimate {
            predicted_price,
            features,
        })
    }
}
