//! # House Price
//!
//! Price estimation service for house listings. A JSON description of a
//! house (bathrooms, balconies, rooms, area, locality, property type and
//! availability) is encoded into the feature vector a regression model was
//! trained on, and the model's output is returned as the estimated price.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use house_price::{
//!     model::LinearRegression,
//!     schema::{FeatureSchema, NumericColumns},
//!     PriceEstimator,
//! };
//!
//! let columns = ["bathrooms", "balcony", "rooms", "area", "Whitefield"]
//!     .map(String::from)
//!     .to_vec();
//! let schema = FeatureSchema::from_columns(columns, &NumericColumns::default()).unwrap();
//! let model = LinearRegression {
//!     coefficients: vec![1.0, 0.5, 2.0, 0.01, 15.0],
//!     intercept: 3.0,
//! };
//! let estimator = PriceEstimator::new(schema, Arc::new(model)).unwrap();
//!
//! let request = serde_json::json!({
//!     "bathrooms": 2, "balcony": 1, "rooms": 3, "area": 1200,
//!     "locality": "Whitefield", "property_type": "Apartment",
//!     "availability": "Ready To Move"
//! });
//! let estimate = estimator.estimate(&request).unwrap();
//! assert_eq!(estimate.features.as_slice(), &[2.0, 1.0, 3.0, 1200.0, 1.0]);
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: column list partitioned into numeric slots and indicators
//! - [`encoder`]: JSON request → feature vector
//! - [`model`]: [`model::Predictor`] trait and the supported model families
//! - [`estimator`]: schema + model loaded together, encode → predict
//! - `api`: axum router (`server` feature)

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)] // Allow float comparisons in tests
#![allow(clippy::cast_precision_loss)]

#[cfg(feature = "server")]
pub mod api;
/// CLI command implementations (extracted for testability)
#[cfg(feature = "server")]
pub mod cli;
pub mod config;
pub mod encoder;
pub mod error;
pub mod estimator;
pub mod model;
pub mod schema;

// Re-exports for convenience
pub use error::{PredictError, Result};
pub use estimator::PriceEstimator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
        assert!(VERSION.contains('.'));
    }
}
