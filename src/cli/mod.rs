//! CLI command implementations
//!
//! Argument definitions and command handlers, kept out of main.rs so the
//! handlers can be tested directly.

#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    api::{create_router, AppState},
    config::{ArtifactArgs, ServerArgs},
    error::{PredictError, Result},
    estimator::PriceEstimator,
};

/// House price prediction service
#[derive(Parser)]
#[command(name = "house-price")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
#[allow(missing_docs)] // flattened groups are documented on their own types
pub enum Commands {
    /// Start the prediction server
    ///
    /// Examples:
    ///   house-price serve -m house_price_model.json -c columns.json
    ///   house-price serve -H 0.0.0.0 -p 8080
    Serve {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        #[command(flatten)]
        server: ServerArgs,
    },
    /// Run one prediction without starting a server
    ///
    /// Examples:
    ///   house-price predict '{"bathrooms":2,"balcony":1,"rooms":3,"area":1200,...}'
    ///   house-price predict --file request.json --show-features
    Predict {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Request JSON (same body as POST /predict)
        #[arg(value_name = "JSON", required_unless_present = "file")]
        request: Option<String>,

        /// Read the request JSON from a file
        #[arg(short, long, conflicts_with = "request")]
        file: Option<PathBuf>,

        /// Include the encoded feature vector in the output
        #[arg(long)]
        show_features: bool,
    },
    /// Show how the schema is partitioned and which model is loaded
    Inspect {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show version info
    Info,
}

/// Main CLI entrypoint - dispatches commands to handlers
pub async fn entrypoint(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { artifacts, server } => serve(&artifacts, &server).await,
        Commands::Predict {
            artifacts,
            request,
            file,
            show_features,
        } => {
            let estimator = artifacts.load()?;
            let request = match (request, file) {
                (Some(json), _) => json,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .map_err(|source| PredictError::Io { path, source })?,
                (None, None) => {
                    return Err(PredictError::InvalidPayload(
                        "no request given".to_string(),
                    ))
                },
            };
            println!("{}", run_predict(&estimator, &request, show_features)?);
            Ok(())
        },
        Commands::Inspect { artifacts, format } => {
            let estimator = artifacts.load()?;
            println!("{}", format_inspect(&estimator, &format)?);
            Ok(())
        },
        Commands::Info => {
            print_info();
            Ok(())
        },
    }
}

/// Load artifacts and serve the HTTP API until Ctrl-C
pub async fn serve(artifacts: &ArtifactArgs, server: &ServerArgs) -> Result<()> {
    let estimator = artifacts.load()?;
    let addr = server.socket_addr()?;

    let app = create_router(AppState::new(estimator).with_cors(!server.no_cors));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PredictError::Server(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, cors = !server.no_cors, "House price API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PredictError::Server(e.to_string()))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

/// Estimate a single request and render the response JSON
pub fn run_predict(estimator: &PriceEstimator, request: &str, show_features: bool) -> Result<String> {
    let payload: serde_json::Value =
        serde_json::from_str(request).map_err(|e| PredictError::InvalidPayload(e.to_string()))?;
    let estimate = estimator.estimate(&payload)?;

    let output = if show_features {
        serde_json::to_string_pretty(&estimate)
    } else {
        serde_json::to_string_pretty(&serde_json::json!({
            "predicted_price": estimate.predicted_price,
        }))
    };
    output.map_err(|e| PredictError::Inference(format!("Failed to render output: {e}")))
}

/// Describe the loaded schema and model
pub fn format_inspect(estimator: &PriceEstimator, format: &str) -> Result<String> {
    let schema = estimator.schema();
    let predictor = estimator.predictor();

    match format {
        "json" => {
            let numeric: Vec<serde_json::Value> = schema
                .numeric_slots()
                .iter()
                .map(|slot| {
                    serde_json::json!({
                        "field": slot.field,
                        "column": slot.column,
                        "index": slot.index,
                    })
                })
                .collect();
            let value = serde_json::json!({
                "columns": schema.len(),
                "numeric": numeric,
                "indicators": schema.indicator_count(),
                "model_kind": predictor.kind(),
                "model_features": predictor.n_features(),
            });
            serde_json::to_string_pretty(&value)
                .map_err(|e| PredictError::Inference(format!("Failed to render output: {e}")))
        },
        "text" => {
            let mut out = String::new();
            out.push_str(&format!("Columns:     {}\n", schema.len()));
            out.push_str("Numeric slots:\n");
            for slot in schema.numeric_slots() {
                out.push_str(&format!(
                    "  [{}] {} <- {}\n",
                    slot.index,
                    slot.column,
                    slot.field.request_key()
                ));
            }
            out.push_str(&format!("Indicators:  {}\n", schema.indicator_count()));
            out.push_str(&format!(
                "Model:       {} ({} features)",
                predictor.kind(),
                predictor.n_features()
            ));
            Ok(out)
        },
        other => Err(PredictError::InvalidPayload(format!(
            "Unknown format '{other}', expected text or json"
        ))),
    }
}

/// Print version info
pub fn print_info() {
    println!("house-price v{}", crate::VERSION);
    println!("House price estimation over a pre-trained regression model");
    println!();
    println!("Endpoints:");
    println!("  GET  /         - Liveness greeting");
    println!("  GET  /health   - Model and schema summary");
    println!("  POST /predict  - Estimate a price");
    println!();
    println!("Model kinds: linear_regression, gradient_boosting");
}

#[cfg(test)]
mod tests;
