//! Error types for recast-core

use thiserror::Error;

/// Result type alias for recast-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in recast-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// A conversion stage rejected its input
    #[error("transform error in '{stage}': {message}")]
    Transform {
        /// Name of the stage that failed
        stage: String,
        /// Description of the error
        message: String,
        /// Diagnostic output from the stage (e.g. a stack trace)
        detail: Option<String>,
    },

    /// A command-backed stage could not be started
    #[error("failed to start stage '{stage}': {source}")]
    StageSpawn {
        /// Name of the stage
        stage: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The input stream could not be opened or read
    #[error("failed to read input: {0}")]
    InputStream(#[source] std::io::Error),

    /// The output stream could not be opened, written or flushed
    #[error("failed to write output: {0}")]
    OutputStream(#[source] std::io::Error),

    /// The derived output path is the source file itself
    #[error("output path is the source file: {}", path.display())]
    OutputIsSource {
        /// The file that would have been overwritten
        path: std::path::PathBuf,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Diagnostic detail attached to a transform failure, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Transform { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
