//! Observability hooks for pipeline stages.
//!
//! Stages report what they do through a [`PipelineEvents`] collaborator handed
//! to them at construction. The default implementation emits `tracing` events.

use migration_repository::{SourceError, TransformError, WriteError};
use migration_shared::Page;
use tracing::{debug, error, info, warn};

/// Receives structured events from the fetcher, orchestrator and sink.
///
/// Every method has an empty default so implementations only override what
/// they care about. Called from several tasks, hence `Send + Sync`.
pub trait PipelineEvents: Send + Sync {
    /// A page request returned `returned` records.
    fn page_fetched(&self, _page: Page, _returned: usize) {}

    /// A page request failed; the stream is over.
    fn fetch_failed(&self, _page: Page, _error: &SourceError) {}

    /// A record failed to transform and was dropped.
    fn record_dropped(&self, _error: &TransformError) {}

    /// A transformed record was handed to the sink.
    fn record_forwarded(&self) {}

    /// The sink persisted a record.
    fn record_written(&self) {}

    /// The sink failed to persist a record; the sink is stopping.
    fn write_failed(&self, _error: &WriteError) {}

    /// The orchestrator settled on an outcome.
    fn pipeline_finished(&self, _outcome: &str) {}
}

/// Emits every pipeline event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl PipelineEvents for TracingEvents {
    fn page_fetched(&self, page: Page, returned: usize) {
        debug!(offset = page.offset, size = page.size, returned, "Fetched page");
    }

    fn fetch_failed(&self, page: Page, error: &SourceError) {
        error!(offset = page.offset, size = page.size, error = %error, "Could not retrieve page of results");
    }

    fn record_dropped(&self, error: &TransformError) {
        warn!(error = %error, "Dropping record that failed to transform");
    }

    fn write_failed(&self, error: &WriteError) {
        error!(error = %error, "Could not write record to destination");
    }

    fn pipeline_finished(&self, outcome: &str) {
        info!(outcome, "Pipeline finished");
    }
}
