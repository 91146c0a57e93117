//! Terminal result of a pipeline run.

use std::fmt;

use migration_repository::{SourceError, WriteError};

/// Counters gathered during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Records received from the fetcher.
    pub received: u64,
    /// Records dropped because they failed to transform.
    pub dropped: u64,
    /// Records handed to the sink.
    pub forwarded: u64,
    /// Records the sink reported as written.
    pub written: u64,
}

/// How a pipeline run ended. Exactly one is produced per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The source was exhausted and the sink drained everything forwarded.
    Completed(PipelineStats),
    /// The source failed or stopped early.
    SourceError(SourceError),
    /// The sink failed to write a record.
    SinkError(WriteError),
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Completed(_))
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineOutcome::Completed(_) => 0,
            PipelineOutcome::SourceError(_) => 2,
            PipelineOutcome::SinkError(_) => 3,
        }
    }

    /// Short name of the stage the outcome is attributed to.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineOutcome::Completed(_) => "completed",
            PipelineOutcome::SourceError(_) => "source",
            PipelineOutcome::SinkError(_) => "sink",
        }
    }
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineOutcome::Completed(stats) => write!(
                f,
                "completed: {} received, {} dropped, {} written",
                stats.received, stats.dropped, stats.written
            ),
            PipelineOutcome::SourceError(e) => write!(f, "source failed: {}", e),
            PipelineOutcome::SinkError(e) => write!(f, "sink failed: {}", e),
        }
    }
}
