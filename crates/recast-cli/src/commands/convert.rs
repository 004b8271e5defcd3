//! Convert files in place

use anyhow::{Context, Result};
use recast_core::config::CONFIG_FILE;
use recast_core::{Config, PathSequencer};
use std::path::{Path, PathBuf};

/// Run the convert command
///
/// A configuration named explicitly must exist. Without one, `recast.yaml`
/// in the working directory is used when present, defaults otherwise.
pub async fn run(config_path: Option<&Path>, paths: Vec<PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(CONFIG_FILE),
    }
    .context("Failed to load configuration")?;
    if let Some(source) = &config.source {
        tracing::debug!("Using configuration from {}", source.display());
    }

    let chain = config
        .build_chain()
        .context("Failed to build conversion stages")?;
    tracing::debug!("Stages: {:?}", chain.stage_names());

    let total = paths.len();
    let errors = PathSequencer::new(chain).run(paths).await;

    if errors.is_empty() {
        tracing::debug!("Converted {} file(s)", total);
        return Ok(());
    }

    for failure in &errors {
        tracing::error!("✗ {}", failure);
    }
    anyhow::bail!("{} of {} file(s) failed to convert", errors.len(), total)
}
