//! Error types for the migration pipeline.

use thiserror::Error;

/// Errors that can occur while setting up or wiring the pipeline.
///
/// Per-record and per-stage failures during a run are reported through
/// [`crate::PipelineOutcome`] instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PipelineError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
