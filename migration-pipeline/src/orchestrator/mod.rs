//! Orchestrator module for the migration pipeline.
//!
//! Coordinates the fetcher, transformer and sink for a single run.

mod outcome;

pub use outcome::{PipelineOutcome, PipelineStats};

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::errors::PipelineError;
use crate::events::{PipelineEvents, TracingEvents};
use crate::fetcher::{FetchStream, PaginatedFetcher};
use crate::loader::{Sink, SinkHandle};
use crate::processor::RecordTransformer;
use migration_repository::{PageSource, RecordWriter, SourceError, WriteError};
use migration_shared::{SearchQuery, StreamItem};

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Capacity of the channel between the orchestrator and the sink.
    pub sink_buffer_size: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            sink_buffer_size: 10,
        }
    }
}

/// Why the select loop stopped.
enum Exit {
    Completed,
    Source(SourceError),
    /// The sink stopped; its error may still be in flight.
    Sink(Option<WriteError>),
    Shutdown,
}

/// Orchestrator that coordinates the pipeline components.
///
/// The orchestrator:
/// - Receives records from the fetcher and watches both error channels
/// - Transforms each record and forwards it to the sink
/// - Cancels the fetcher when the sink fails
/// - Waits for both tasks before reporting a single outcome
pub struct Orchestrator {
    config: OrchestratorConfig,
    events: Arc<dyn PipelineEvents>,
    shutdown: CancellationToken,
}

impl Orchestrator {
    /// Create a new orchestrator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(config: OrchestratorConfig) -> Self {
        Self {
            config,
            events: Arc::new(TracingEvents),
            shutdown: CancellationToken::new(),
        }
    }

    /// Report progress to `events` instead of the default tracing sink.
    pub fn with_events(mut self, events: Arc<dyn PipelineEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Token that aborts any run of this orchestrator when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Trigger a shutdown of the running pipeline.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wire a fetcher, transformer and writer together and run them.
    ///
    /// Both tasks get child tokens of the shutdown token, so
    /// [`Orchestrator::shutdown`] stops everything.
    pub async fn execute<S, X, W, Out>(
        &self,
        fetcher: &PaginatedFetcher<S>,
        query: SearchQuery,
        transformer: &X,
        writer: W,
    ) -> Result<PipelineOutcome, PipelineError>
    where
        S: PageSource + 'static,
        X: RecordTransformer<S::Record, Out> + ?Sized,
        W: RecordWriter<Out> + 'static,
        Out: Send + Sync + 'static,
    {
        let fetch = fetcher.stream(query, self.shutdown.child_token())?;

        let (sink_input, sink_rx) = Sink::<W>::channel(self.config.sink_buffer_size);
        let sink = Sink::new(writer)
            .with_events(Arc::clone(&self.events))
            .drain(sink_rx, self.shutdown.child_token());

        Ok(self.run(fetch, transformer, sink_input, sink).await)
    }

    /// Run the pipeline until it completes or a stage fails.
    ///
    /// Returns once both the fetch task and the sink task have stopped.
    #[instrument(skip_all)]
    pub async fn run<In, Out, X>(
        &self,
        fetch: FetchStream<In>,
        transformer: &X,
        sink_input: mpsc::Sender<StreamItem<Out>>,
        mut sink: SinkHandle,
    ) -> PipelineOutcome
    where
        In: Send + 'static,
        Out: Send + Sync + 'static,
        X: RecordTransformer<In, Out> + ?Sized,
    {
        info!("Starting migration pipeline");

        let FetchStream {
            data: mut fetch_data,
            errors: mut fetch_errors,
            cancel: fetch_cancel,
            handle: fetch_handle,
        } = fetch;
        let mut stats = PipelineStats::default();

        let exit = loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Received shutdown signal");
                    break Exit::Shutdown;
                }
                Some(e) = sink.errors.recv() => {
                    break Exit::Sink(Some(e));
                }
                item = fetch_data.recv() => match item {
                    Some(StreamItem::Data(record)) => {
                        stats.received += 1;
                        let result = tokio::select! {
                            biased;
                            _ = self.shutdown.cancelled() => {
                                info!("Received shutdown signal during transform");
                                break Exit::Shutdown;
                            }
                            result = transformer.transform(record) => result,
                        };
                        let transformed = match result {
                            Ok(out) => out,
                            Err(e) => {
                                stats.dropped += 1;
                                self.events.record_dropped(&e);
                                continue;
                            }
                        };
                        match self.forward(&sink_input, StreamItem::Data(transformed)).await {
                            Forward::Sent => {
                                stats.forwarded += 1;
                                self.events.record_forwarded();
                            }
                            Forward::SinkGone => break Exit::Sink(None),
                            Forward::Shutdown => break Exit::Shutdown,
                        }
                    }
                    Some(StreamItem::EndOfStream) => {
                        debug!(received = stats.received, "Source exhausted");
                        match self.forward(&sink_input, StreamItem::EndOfStream).await {
                            Forward::Sent => break Exit::Completed,
                            Forward::SinkGone => break Exit::Sink(None),
                            Forward::Shutdown => break Exit::Shutdown,
                        }
                    }
                    None => {
                        // Closed without the marker: the fetcher failed or was stopped.
                        let error = fetch_errors.recv().await.unwrap_or_else(|| {
                            SourceError::aborted("source stopped before end of stream")
                        });
                        break Exit::Source(error);
                    }
                },
                Some(e) = fetch_errors.recv() => {
                    break Exit::Source(e);
                }
            }
        };

        match &exit {
            Exit::Sink(_) => fetch_cancel.cancel(),
            Exit::Shutdown => {
                fetch_cancel.cancel();
                sink.cancel.cancel();
            }
            Exit::Source(_) => {
                // Let the sink finish what was already forwarded.
                let _ = self.forward(&sink_input, StreamItem::EndOfStream).await;
            }
            Exit::Completed => {}
        }
        drop(sink_input);

        let stopped = tokio::select! {
            biased;
            _ = &mut sink.done => true,
            _ = self.shutdown.cancelled() => false,
        };
        if !stopped {
            info!("Received shutdown signal while the sink was draining");
            sink.cancel.cancel();
            let _ = (&mut sink.done).await;
        }
        // Records forwarded but not written mean the run did not complete.
        let exit = match exit {
            Exit::Completed if !stopped => Exit::Shutdown,
            exit => exit,
        };
        let late_error = sink.errors.try_recv().ok();

        fetch_cancel.cancel();
        if let Err(e) = fetch_handle.await {
            warn!(error = %e, "Fetch task did not finish cleanly");
        }
        stats.written = match sink.handle.await {
            Ok(written) => written,
            Err(e) => {
                warn!(error = %e, "Sink task did not finish cleanly");
                0
            }
        };

        let outcome = match (exit, late_error) {
            (Exit::Completed, None) => PipelineOutcome::Completed(stats),
            (Exit::Completed, Some(e)) => PipelineOutcome::SinkError(e),
            (Exit::Source(e), late) => {
                if let Some(sink_error) = late {
                    warn!(error = %sink_error, "Sink also failed after source error");
                }
                PipelineOutcome::SourceError(e)
            }
            (Exit::Sink(Some(e)), _) | (Exit::Sink(None), Some(e)) => PipelineOutcome::SinkError(e),
            (Exit::Sink(None), None) => {
                PipelineOutcome::SinkError(WriteError::transport("sink stopped before end of stream"))
            }
            (Exit::Shutdown, _) => {
                PipelineOutcome::SourceError(SourceError::aborted("pipeline shut down"))
            }
        };

        self.events.pipeline_finished(outcome.stage());
        info!(
            received = stats.received,
            dropped = stats.dropped,
            forwarded = stats.forwarded,
            written = stats.written,
            exit_code = outcome.exit_code(),
            "Orchestrator shutdown complete"
        );
        outcome
    }

    /// Send one item to the sink unless the pipeline is shutting down.
    async fn forward<Out>(
        &self,
        sink_input: &mpsc::Sender<StreamItem<Out>>,
        item: StreamItem<Out>,
    ) -> Forward
    where
        Out: Send + 'static,
    {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Forward::Shutdown,
            sent = sink_input.send(item) => match sent {
                Ok(()) => Forward::Sent,
                Err(_) => Forward::SinkGone,
            },
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

enum Forward {
    Sent,
    SinkGone,
    Shutdown,
}
