//! recast CLI
//!
//! Converts CoffeeScript files to modern JavaScript in place.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// recast - convert CoffeeScript sources to modern JavaScript, in place
#[derive(Parser)]
#[command(name = "recast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (uses ./recast.yaml when present if omitted)
    #[arg(short, long, env = "RECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Files to convert, in order
    paths: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    commands::convert::run(cli.config.as_deref(), cli.paths).await
}
