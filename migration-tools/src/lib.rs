//! # Migration Tools
//!
//! Entry points and wiring for the one-shot migration utilities.
//!
//! Each binary parses its flags into the connection configs of
//! `migration-repository`, builds a fetcher, a transformer from [`mapping`]
//! and a writer, and hands them to the pipeline orchestrator. The process
//! exit status is taken from the pipeline outcome.

pub mod config;
pub mod jobs;
pub mod mapping;

pub use config::{init_tracing, shutdown_on_ctrl_c, LogFormat};
pub use jobs::{fix_media_flags, migrate_old_assetfolders};

use thiserror::Error;

/// Errors that can occur while setting up a migration tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] migration_pipeline::PipelineError),

    /// Error setting up a Vidispine source.
    #[error("Source error: {0}")]
    SourceError(#[from] migration_repository::SourceError),

    /// Database connection error.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl ToolError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
