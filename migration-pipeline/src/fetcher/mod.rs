//! Fetcher module for the migration pipeline.
//!
//! Turns a paginated [`migration_repository::PageSource`] into a bounded
//! stream of single records.

mod config;
mod paginated_fetcher;

pub use config::{FetcherConfig, RetryPolicy, MAX_BUFFER_SIZE};
pub use paginated_fetcher::{FetchStream, PaginatedFetcher};
