//! Regression models behind the [`Predictor`] trait
//!
//! The serving path treats a model as an opaque batch function: rows in,
//! one price per row out. Two model families are supported, both loaded
//! from a JSON artifact tagged by `kind`:
//!
//! ```json
//! {"kind": "linear_regression", "coefficients": [0.4, 0.1, 2.0, 0.05], "intercept": 12.0}
//! ```
//!
//! ```json
//! {"kind": "gradient_boosting", "n_features": 4, "base_score": 50.0, "learning_rate": 0.1,
//!  "trees": [{"nodes": [{"split": {"feature": 3, "threshold": 1000.0, "left": 1, "right": 2}},
//!                       {"leaf": {"value": -5.0}}, {"leaf": {"value": 8.0}}]}]}
//! ```

use std::{fs, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    encoder::FeatureVector,
    error::{PredictError, Result},
};

/// A trained regression model
pub trait Predictor: Send + Sync {
    /// Input width the model was trained on
    fn n_features(&self) -> usize;

    /// Predict one value per row
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::ShapeMismatch`] if a row has the wrong width.
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>>;

    /// Short model family name for logs and health output
    fn kind(&self) -> &'static str;
}

fn check_width(expected: usize, row: &FeatureVector) -> Result<()> {
    if row.len() != expected {
        return Err(PredictError::ShapeMismatch {
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

/// Ordinary least squares model: `intercept + Σ coefficient·x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// One weight per feature column
    pub coefficients: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

impl LinearRegression {
    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(PredictError::InvalidModel(
                "linear regression has no coefficients".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(PredictError::InvalidModel(
                "linear regression weights must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl Predictor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        rows.iter()
            .map(|row| -> Result<f64> {
                check_width(self.n_features(), row)?;
                Ok(self.intercept
                    + row
                        .as_slice()
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, w)| x * w)
                        .sum::<f64>())
            })
            .collect()
    }

    fn kind(&self) -> &'static str {
        "linear_regression"
    }
}

/// Node of a flattened regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node; rows with `x[feature] <= threshold` go left
    Split {
        /// Feature column tested
        feature: usize,
        /// Split threshold
        threshold: f64,
        /// Index of the left child
        left: usize,
        /// Index of the right child
        right: usize,
    },
    /// Terminal node
    Leaf {
        /// Leaf output
        value: f64,
    },
}

/// A single regression tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    /// Nodes in flat storage order
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(PredictError::InvalidModel("tree has no nodes".to_string()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(PredictError::InvalidModel(format!(
                            "node {i} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(PredictError::InvalidModel(format!(
                            "node {i} has a NaN threshold"
                        )));
                    }
                    // Children must come after their parent, which rules out cycles.
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(PredictError::InvalidModel(format!(
                                "node {i} has invalid child index {child}"
                            )));
                        }
                    }
                },
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(PredictError::InvalidModel(format!(
                            "leaf {i} has a non-finite value"
                        )));
                    }
                },
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    ///
    /// Trees built in code skip `validate`, so every lookup is checked and the
    /// walk is bounded by the node count.
    fn evaluate(&self, x: &[f64]) -> Result<f64> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(index).ok_or_else(|| {
                PredictError::Inference(format!("tree has no node {index}"))
            })?;
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = x.get(*feature).ok_or_else(|| {
                        PredictError::Inference(format!(
                            "node {index} splits on feature {feature}, row has {}",
                            x.len()
                        ))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                },
            }
        }
        Err(PredictError::Inference(
            "tree walk did not reach a leaf".to_string(),
        ))
    }
}

/// Additive ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoosting {
    /// Input width
    pub n_features: usize,
    /// Initial prediction before any tree
    pub base_score: f64,
    /// Shrinkage applied to every tree output
    pub learning_rate: f64,
    /// Boosting stages
    pub trees: Vec<RegressionTree>,
}

impl GradientBoosting {
    fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(PredictError::InvalidModel(
                "gradient boosting declares zero features".to_string(),
            ));
        }
        if !self.base_score.is_finite() || !self.learning_rate.is_finite() {
            return Err(PredictError::InvalidModel(
                "base_score and learning_rate must be finite".to_string(),
            ));
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.validate(self.n_features))
    }
}

impl Predictor for GradientBoosting {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        rows.iter()
            .map(|row| -> Result<f64> {
                check_width(self.n_features, row)?;
                let x = row.as_slice();
                let boost = self
                    .trees
                    .iter()
                    .map(|t| t.evaluate(x))
                    .sum::<Result<f64>>()?;
                Ok(self.base_score + self.learning_rate * boost)
            })
            .collect()
    }

    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }
}

/// On-disk model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// [`LinearRegression`]
    LinearRegression(LinearRegression),
    /// [`GradientBoosting`]
    GradientBoosting(GradientBoosting),
}

impl ModelArtifact {
    /// Validate and turn the artifact into a shareable predictor
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::InvalidModel`] if the weights or tree
    /// structure are inconsistent.
    pub fn into_predictor(self) -> Result<Arc<dyn Predictor>> {
        match self {
            Self::LinearRegression(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            },
            Self::GradientBoosting(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            },
        }
    }
}

/// Load a model artifact from `path`
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the model is
/// invalid.
pub fn load_model(path: &Path) -> Result<Arc<dyn Predictor>> {
    let text = fs::read_to_string(path).map_err(|source| PredictError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ModelArtifact =
        serde_json::from_str(&text).map_err(|e| PredictError::ArtifactParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let predictor = artifact.into_predictor()?;
    tracing::info!(
        path = %path.display(),
        kind = predictor.kind(),
        n_features = predictor.n_features(),
        "Loaded model"
    );
    Ok(predictor)
}
