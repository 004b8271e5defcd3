//! recast Core Library
//!
//! This crate provides the conversion pipeline behind the `recast` CLI:
//! - Output path derivation for each source file
//! - Transform stages and the fixed CoffeeScript → ES chain
//! - The stream converter that buffers, transforms and writes one file
//! - The path sequencer that drives a batch one file at a time
//! - Configuration loading
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Path     │────▶│   Stream    │────▶│  Transform  │
//! │  Sequencer  │     │  Converter  │     │    Chain    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use recast_core::{Config, PathSequencer};
//!
//! let config = Config::load_or_default("recast.yaml")?;
//! let sequencer = PathSequencer::new(config.build_chain()?);
//! let errors = sequencer.run(vec!["src/app.coffee".into()]).await;
//! for failure in &errors {
//!     eprintln!("{}: {}", failure.job.source_path.display(), failure.error);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod converter;
pub mod error;
pub mod paths;
pub mod sequencer;
pub mod transforms;

pub use config::{Config, PipelineConfig};
pub use converter::convert_stream;
pub use error::{Error, Result};
pub use paths::{PathJob, output_path};
pub use sequencer::{ErrorLog, JobFailure, PathSequencer};
pub use transforms::{CommandTransform, EcmaFeatures, EsnextOptions, Transform, TransformChain};
