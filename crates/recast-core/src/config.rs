//! Configuration parsing
//!
//! recast reads an optional `recast.yaml` describing which programs perform
//! each conversion stage. Every field has a default, so a missing file simply
//! means "use `decaffeinate` and `esnext` from `PATH`".
//!
//! # Example
//!
//! ```yaml
//! stages:
//!   coffee:
//!     command: decaffeinate
//!   esnext:
//!     command: esnext
//!     ecma_features:
//!       jsx: true
//!       experimental_object_rest_spread: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::transforms::{CommandTransform, EcmaFeatures, EsnextOptions, TransformChain};

/// Default configuration file name
pub const CONFIG_FILE: &str = "recast.yaml";

/// Root configuration from `recast.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Stage programs
    #[serde(default)]
    pub stages: StagesConfig,
}

/// The two conversion stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagesConfig {
    /// CoffeeScript → JavaScript
    #[serde(default = "default_coffee_stage")]
    pub coffee: StageConfig,

    /// JavaScript → modern JavaScript
    #[serde(default = "default_esnext_stage")]
    pub esnext: EsnextStageConfig,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            coffee: default_coffee_stage(),
            esnext: default_esnext_stage(),
        }
    }
}

/// An external program used as a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Program to run (looked up on `PATH`)
    pub command: String,

    /// Extra arguments
    #[serde(default)]
    pub args: Vec<String>,
}

/// The `esnext` stage and its syntax options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsnextStageConfig {
    /// Program and arguments
    #[serde(flatten)]
    pub stage: StageConfig,

    /// Enabled syntax extensions
    #[serde(default)]
    pub ecma_features: EcmaFeatures,
}

fn default_coffee_stage() -> StageConfig {
    StageConfig {
        command: "decaffeinate".to_string(),
        args: Vec::new(),
    }
}

fn default_esnext_stage() -> EsnextStageConfig {
    EsnextStageConfig {
        stage: StageConfig {
            command: "esnext".to_string(),
            args: Vec::new(),
        },
        ecma_features: EcmaFeatures::default(),
    }
}

/// Main configuration container
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Pipeline configuration
    pub pipeline: PipelineConfig,

    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file or directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a `recast.yaml` file, or a directory containing one
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = resolve(path.as_ref());

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let pipeline: PipelineConfig = serde_yaml::from_str(&contents)?;
        pipeline.validate()?;

        tracing::debug!("Loaded configuration from {}", config_path.display());
        Ok(Self {
            pipeline,
            source: Some(config_path),
        })
    }

    /// Like [`Config::load`], but fall back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigNotFound { path }) => {
                tracing::debug!("No configuration at {}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Build the `coffee` → `esnext` chain described by this configuration
    pub fn build_chain(&self) -> Result<TransformChain> {
        let stages = &self.pipeline.stages;

        let coffee = CommandTransform::new("coffee", &stages.coffee.command)
            .with_args(stages.coffee.args.iter().cloned());

        let options = EsnextOptions {
            ecma_features: stages.esnext.ecma_features,
        };
        let esnext = CommandTransform::new("esnext", &stages.esnext.stage.command)
            .with_args(stages.esnext.stage.args.iter().cloned())
            .with_options(&options)?;

        Ok(TransformChain::standard(coffee, esnext))
    }
}

impl PipelineConfig {
    fn validate(&self) -> Result<()> {
        for (name, stage) in [
            ("coffee", &self.stages.coffee),
            ("esnext", &self.stages.esnext.stage),
        ] {
            if stage.command.trim().is_empty() {
                return Err(Error::ConfigInvalid {
                    message: format!("stage '{}' has an empty command", name),
                });
            }
        }
        Ok(())
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}
