//! House price CLI
//!
//! # Commands
//!
//! - `serve` - Start the prediction server
//! - `predict` - One-shot prediction from JSON
//! - `inspect` - Show the schema partition and model summary
//! - `info` - Show version info
//!
//! Logging goes to stderr; set `RUST_LOG` to override the default
//! `house_price=info` filter.

use clap::Parser;
use house_price::{
    cli::{entrypoint, Cli},
    error::Result,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "house_price=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    entrypoint(cli).await
}
