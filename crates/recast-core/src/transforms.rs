//! Conversion stages
//!
//! A stage turns one complete source document into another. Stages are
//! chained: the output of one is the input of the next, and the first failure
//! stops the chain.
//!
//! # Standard chain
//!
//! - `coffee` - CoffeeScript → JavaScript
//! - `esnext` - JavaScript → modern JavaScript, with JSX and object
//!   rest/spread enabled
//!
//! Stages are usually external programs (see [`CommandTransform`]) that read
//! source text on stdin and print the converted text on stdout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Environment variable carrying a stage's options as JSON
pub const STAGE_OPTIONS_ENV: &str = "RECAST_STAGE_OPTIONS";

/// A single source-to-source conversion step
#[async_trait]
pub trait Transform: Send + Sync {
    /// Stage name used in errors and logs
    fn name(&self) -> &str;

    /// Convert a whole document
    async fn apply(&self, source: &str) -> Result<String>;
}

/// Syntax extensions accepted by the `esnext` stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EcmaFeatures {
    /// Accept JSX syntax
    #[serde(default = "enabled")]
    pub jsx: bool,

    /// Accept object rest/spread syntax
    #[serde(default = "enabled", alias = "experimental_object_rest_spread")]
    pub experimental_object_rest_spread: bool,
}

fn enabled() -> bool {
    true
}

impl Default for EcmaFeatures {
    fn default() -> Self {
        Self {
            jsx: true,
            experimental_object_rest_spread: true,
        }
    }
}

/// Options passed to the `esnext` stage
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EsnextOptions {
    /// Enabled syntax extensions
    pub ecma_features: EcmaFeatures,
}

/// A stage backed by an external program
///
/// The source text is written to the program's stdin and the converted text
/// is read from its stdout. A non-zero exit status is a transform failure
/// whose detail is whatever the program wrote to stderr.
#[derive(Debug, Clone)]
pub struct CommandTransform {
    name: String,
    program: String,
    args: Vec<String>,
    options: Option<serde_json::Value>,
}

impl CommandTransform {
    /// Create a stage that runs `program` with no arguments
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            options: None,
        }
    }

    /// Set the program arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Pass options to the program through [`STAGE_OPTIONS_ENV`]
    pub fn with_options<T: Serialize>(mut self, options: &T) -> Result<Self> {
        self.options = Some(serde_json::to_value(options)?);
        Ok(self)
    }

    fn failure(&self, message: impl Into<String>, detail: Option<String>) -> Error {
        Error::Transform {
            stage: self.name.clone(),
            message: message.into(),
            detail,
        }
    }
}

#[async_trait]
impl Transform for CommandTransform {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, source: &str) -> Result<String> {
        tracing::debug!(
            "Running stage '{}': {} {:?}",
            self.name,
            self.program,
            self.args
        );

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(options) = &self.options {
            command.env(STAGE_OPTIONS_ENV, options.to_string());
        }

        let mut child = command.spawn().map_err(|e| Error::StageSpawn {
            stage: self.name.clone(),
            source: e,
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.failure("stdin was not captured", None))?;

        let feed = async move {
            let written = stdin.write_all(source.as_bytes()).await;
            drop(stdin);
            written
        };
        let (written, output) = tokio::join!(feed, child.wait_with_output());

        let output =
            output.map_err(|e| self.failure(format!("failed to wait: {}", e), None))?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = (!stderr.is_empty()).then_some(stderr);

        if !output.status.success() {
            return Err(self.failure(format!("exited with {}", output.status), detail));
        }

        // A program may legitimately exit before draining stdin.
        if let Err(e) = written
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(self.failure(format!("failed to write input: {}", e), detail));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| self.failure("output is not valid UTF-8", detail))
    }
}

/// An ordered list of stages applied one after another
#[derive(Default)]
pub struct TransformChain {
    stages: Vec<Box<dyn Transform>>,
}

impl TransformChain {
    /// Create an empty chain (returns its input unchanged)
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed two-stage chain: `coffee` then `esnext`
    pub fn standard(coffee: impl Transform + 'static, esnext: impl Transform + 'static) -> Self {
        Self::new().then(coffee).then(esnext)
    }

    /// Append a stage
    pub fn then(mut self, stage: impl Transform + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order, stopping at the first failure
    pub async fn apply(&self, source: &str) -> Result<String> {
        let mut current = source.to_string();
        for stage in &self.stages {
            current = stage.apply(&current).await?;
            tracing::debug!("Stage '{}' produced {} bytes", stage.name(), current.len());
        }
        Ok(current)
    }
}

impl std::fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformChain")
            .field("stages", &self.stage_names())
            .finish()
    }
}
