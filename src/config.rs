//! Command-line and environment configuration
//!
//! Every option has a long flag and, where it makes sense for deployment,
//! an environment variable fallback (`HOUSE_PRICE_*`).

use std::{net::SocketAddr, path::PathBuf};

use clap::Args;

use crate::{
    error::{PredictError, Result},
    estimator::{ArtifactPaths, PriceEstimator},
    schema::NumericColumns,
};

/// Default listen port; the web client targets `localhost:5000`
pub const DEFAULT_PORT: u16 = 5000;

/// Where to find the training artifacts and how to read the schema
#[derive(Debug, Clone, Args)]
pub struct ArtifactArgs {
    /// Trained model artifact (JSON)
    #[arg(
        short,
        long,
        env = "HOUSE_PRICE_MODEL",
        default_value = "house_price_model.json"
    )]
    pub model: PathBuf,

    /// Training column list (JSON array of strings)
    #[arg(short, long, env = "HOUSE_PRICE_COLUMNS", default_value = "columns.json")]
    pub columns: PathBuf,

    /// Schema column holding `bathrooms`
    #[arg(long, default_value = "bathrooms")]
    pub bathrooms_column: String,

    /// Schema column holding `balcony`
    #[arg(long, default_value = "balcony")]
    pub balcony_column: String,

    /// Schema column holding `rooms`
    #[arg(long, default_value = "rooms")]
    pub rooms_column: String,

    /// Schema column holding `area`
    #[arg(long, default_value = "area")]
    pub area_column: String,
}

impl ArtifactArgs {
    /// Artifact file locations
    #[must_use]
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model.clone(),
            columns: self.columns.clone(),
        }
    }

    /// Numeric column mapping
    #[must_use]
    pub fn numeric_columns(&self) -> NumericColumns {
        NumericColumns {
            bathrooms: self.bathrooms_column.clone(),
            balcony: self.balcony_column.clone(),
            rooms: self.rooms_column.clone(),
            area: self.area_column.clone(),
        }
    }

    /// Load schema and model
    ///
    /// # Errors
    ///
    /// See [`PriceEstimator::load`].
    pub fn load(&self) -> Result<PriceEstimator> {
        PriceEstimator::load(&self.paths(), &self.numeric_columns())
    }
}

/// Listener settings for `serve`
#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    /// Host to bind to
    #[arg(short = 'H', long, env = "HOUSE_PRICE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, env = "HOUSE_PRICE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Disable the permissive cross-origin policy
    #[arg(long)]
    pub no_cors: bool,
}

impl ServerArgs {
    /// Parsed listen address
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::Server`] if host and port do not form a
    /// socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| PredictError::Server(format!("Invalid address {}: {e}", self.host)))
    }
}
