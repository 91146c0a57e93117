//! # Migration Pipeline
//!
//! This crate provides the streaming pipeline that every migration tool runs:
//! pull records page by page from a source, transform them one at a time and
//! write them to a destination, with bounded memory and cooperative shutdown.
//!
//! ## Architecture
//!
//! The pipeline follows the Fetcher-Processor-Loader pattern:
//!
//! 1. **Fetcher**: Pages through a `PageSource` and streams single records
//! 2. **Processor**: Maps or enriches each record; failures drop the record
//! 3. **Loader**: The sink task that writes each record to the destination
//! 4. **Orchestrator**: Merges the data and error channels and decides the outcome
//!
//! Stages run concurrently and talk only through bounded channels. Every
//! blocking point observes a `CancellationToken`, so a failing sink unwinds the
//! fetcher instead of leaving it parked on a full channel.

pub mod errors;
pub mod events;
pub mod fetcher;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use errors::PipelineError;
pub use events::{PipelineEvents, TracingEvents};
pub use fetcher::{FetchStream, FetcherConfig, PaginatedFetcher, RetryPolicy};
pub use loader::{Sink, SinkHandle};
pub use orchestrator::{Orchestrator, OrchestratorConfig, PipelineOutcome, PipelineStats};
pub use processor::{MapTransformer, PassThrough, RecordTransformer};

pub use tokio_util::sync::CancellationToken;
