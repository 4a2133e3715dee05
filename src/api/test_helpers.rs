//! Test helper functions for api tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use tower::util::ServiceExt;

use super::*;
use crate::{
    model::LinearRegression,
    schema::{FeatureSchema, NumericColumns},
};

/// Columns used throughout the API tests
pub const TEST_COLUMNS: [&str; 7] = [
    "bathrooms",
    "balcony",
    "rooms",
    "area",
    "Whitefield",
    "Apartment",
    "Ready To Move",
];

/// Weights chosen so each slot contributes a distinct, readable amount
pub const TEST_COEFFICIENTS: [f64; 7] = [5.0, 1.0, 10.0, 0.05, 20.0, 3.0, 7.0];

/// Bias of the test model
pub const TEST_INTERCEPT: f64 = 2.0;

/// Estimator over [`TEST_COLUMNS`] with a linear model
pub fn create_test_estimator() -> PriceEstimator {
    let columns = TEST_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    let schema = FeatureSchema::from_columns(columns, &NumericColumns::default()).expect("test");
    let model = LinearRegression {
        coefficients: TEST_COEFFICIENTS.to_vec(),
        intercept: TEST_INTERCEPT,
    };
    PriceEstimator::new(schema, Arc::new(model)).expect("test")
}

/// Create a test application around [`create_test_estimator`]
pub fn create_test_app() -> Router {
    create_router(AppState::new(create_test_estimator()))
}

/// Request body matching every indicator column
pub fn scenario_body() -> serde_json::Value {
    serde_json::json!({
        "bathrooms": 2,
        "balcony": 1,
        "rooms": 3,
        "area": 1200,
        "locality": "Whitefield",
        "property_type": "Apartment",
        "availability": "Ready To Move"
    })
}

/// Expected test model output for `features`
pub fn expected_price(features: &[f64]) -> f64 {
    TEST_INTERCEPT
        + features
            .iter()
            .zip(TEST_COEFFICIENTS.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
}

/// POST a raw body to `/predict`
pub async fn post_predict(app: Router, body: impl Into<Body>) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/json")
            .body(body.into())
            .expect("test"),
    )
    .await
    .expect("test")
}

/// Read a response body as bytes
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("test")
        .to_vec()
}
