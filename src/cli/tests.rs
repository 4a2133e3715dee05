use std::sync::Arc;

use clap::Parser;

use super::*;
use crate::{
    model::{GradientBoosting, LinearRegression, RegressionTree, TreeNode},
    schema::{FeatureSchema, NumericColumns},
};

fn schema() -> FeatureSchema {
    let columns = ["bathrooms", "balcony", "rooms", "area", "Baner", "Plot Area"]
        .map(String::from)
        .to_vec();
    FeatureSchema::from_columns(columns, &NumericColumns::default()).expect("test")
}

fn linear_estimator() -> PriceEstimator {
    let model = LinearRegression {
        coefficients: vec![2.0, 1.0, 4.0, 0.1, 30.0, -10.0],
        intercept: 5.0,
    };
    PriceEstimator::new(schema(), Arc::new(model)).expect("test")
}

const REQUEST: &str = r#"{"bathrooms":2,"balcony":0,"rooms":2,"area":900,
    "locality":"Baner","property_type":"Super built-up  Area","availability":"Ready To Move"}"#;

#[test]
fn test_run_predict_prints_price_only() {
    let output = run_predict(&linear_estimator(), REQUEST, false).expect("test");
    let value: serde_json::Value = serde_json::from_str(&output).expect("test");
    // 5 + 4 + 0 + 8 + 90 + 30
    assert_eq!(value["predicted_price"], serde_json::json!(137.0));
    assert!(value.get("features").is_none());
}

#[test]
fn test_run_predict_with_features() {
    let output = run_predict(&linear_estimator(), REQUEST, true).expect("test");
    let value: serde_json::Value = serde_json::from_str(&output).expect("test");
    assert_eq!(
        value["features"],
        serde_json::json!([2.0, 0.0, 2.0, 900.0, 1.0, 0.0])
    );
}

#[test]
fn test_run_predict_invalid_json() {
    let err = run_predict(&linear_estimator(), "{not json", false).unwrap_err();
    assert!(matches!(err, PredictError::InvalidPayload(_)));
}

#[test]
fn test_run_predict_with_tree_model() {
    let model = GradientBoosting {
        n_features: 6,
        base_score: 40.0,
        learning_rate: 1.0,
        trees: vec![RegressionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 3,
                    threshold: 1000.0,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: -4.0 },
                TreeNode::Leaf { value: 12.0 },
            ],
        }],
    };
    let estimator = PriceEstimator::new(schema(), Arc::new(model)).expect("test");

    let output = run_predict(&estimator, REQUEST, false).expect("test");
    let value: serde_json::Value = serde_json::from_str(&output).expect("test");
    assert_eq!(value["predicted_price"], serde_json::json!(36.0));
}

#[test]
fn test_format_inspect_text() {
    let text = format_inspect(&linear_estimator(), "text").expect("test");
    assert!(text.contains("Columns:     6"));
    assert!(text.contains("[3] area <- area"));
    assert!(text.contains("Indicators:  2"));
    assert!(text.contains("linear_regression (6 features)"));
}

#[test]
fn test_format_inspect_json() {
    let json = format_inspect(&linear_estimator(), "json").expect("test");
    let value: serde_json::Value = serde_json::from_str(&json).expect("test");
    assert_eq!(value["columns"], 6);
    assert_eq!(value["numeric"][0]["field"], "bathrooms");
    assert_eq!(value["numeric"][0]["index"], 0);
    assert_eq!(value["model_kind"], "linear_regression");
}

#[test]
fn test_format_inspect_unknown_format() {
    assert!(format_inspect(&linear_estimator(), "yaml").is_err());
}

#[test]
fn test_cli_parses_serve() {
    let cli = Cli::try_parse_from([
        "house-price",
        "serve",
        "-m",
        "model.json",
        "-c",
        "cols.json",
        "-p",
        "9000",
        "--no-cors",
    ])
    .expect("test");

    match cli.command {
        Commands::Serve { artifacts, server } => {
            assert_eq!(artifacts.model, PathBuf::from("model.json"));
            assert_eq!(artifacts.columns, PathBuf::from("cols.json"));
            assert_eq!(server.port, 9000);
            assert!(server.no_cors);
        },
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_cli_predict_requires_input() {
    assert!(Cli::try_parse_from(["house-price", "predict"]).is_err());
}

#[test]
fn test_cli_predict_request_and_file_conflict() {
    let result = Cli::try_parse_from([
        "house-price",
        "predict",
        "{}",
        "--file",
        "request.json",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_cli_predict_from_file() {
    let cli = Cli::try_parse_from([
        "house-price",
        "predict",
        "--file",
        "request.json",
        "--show-features",
    ])
    .expect("test");

    match cli.command {
        Commands::Predict {
            request,
            file,
            show_features,
            ..
        } => {
            assert!(request.is_none());
            assert_eq!(file, Some(PathBuf::from("request.json")));
            assert!(show_features);
        },
        _ => panic!("expected predict"),
    }
}

#[tokio::test]
async fn test_serve_fails_fast_without_artifacts() {
    let cli = Cli::try_parse_from([
        "house-price",
        "serve",
        "-m",
        "/nonexistent/model.json",
        "-c",
        "/nonexistent/columns.json",
    ])
    .expect("test");

    let err = entrypoint(cli).await.unwrap_err();
    assert_eq!(err.stage(), "load");
}
