//! Paginated fetcher implementation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::config::{FetcherConfig, RetryPolicy};
use crate::errors::PipelineError;
use crate::events::{PipelineEvents, TracingEvents};
use migration_repository::{PageSource, SourceError};
use migration_shared::{Page, SearchQuery, StreamItem};

/// Receiving side of a running fetch.
///
/// `data` yields records followed by exactly one `EndOfStream` on success. On
/// failure `data` closes without the marker and `errors` holds the single
/// error that stopped the fetch.
#[derive(Debug)]
pub struct FetchStream<T> {
    /// Records in source order, then the end-of-stream marker.
    pub data: mpsc::Receiver<StreamItem<T>>,
    /// At most one fatal source error.
    pub errors: mpsc::Receiver<SourceError>,
    /// Stops the fetch task at its next send or request.
    pub cancel: CancellationToken,
    /// The fetch task.
    pub handle: JoinHandle<()>,
}

/// Streams every record of a paginated source through a bounded channel.
pub struct PaginatedFetcher<S: PageSource> {
    source: Arc<S>,
    config: FetcherConfig,
    events: Arc<dyn PipelineEvents>,
}

impl<S> PaginatedFetcher<S>
where
    S: PageSource + 'static,
{
    /// Create a fetcher with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, FetcherConfig::default())
    }

    /// Create a fetcher with a custom configuration.
    pub fn with_config(source: S, config: FetcherConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
            events: Arc::new(TracingEvents),
        }
    }

    /// Report progress to `events` instead of the default tracing sink.
    pub fn with_events(mut self, events: Arc<dyn PipelineEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Start fetching `query` using the configured page size.
    pub fn stream(
        &self,
        query: SearchQuery,
        cancel: CancellationToken,
    ) -> Result<FetchStream<S::Record>, PipelineError> {
        self.stream_with_page_size(query, self.config.page_size, cancel)
    }

    /// Start fetching `query` in pages of `page_size` records.
    ///
    /// Returns immediately; the pages are requested by a spawned task that
    /// stops when the source is exhausted, a request fails, or `cancel` fires.
    pub fn stream_with_page_size(
        &self,
        query: SearchQuery,
        page_size: u64,
        cancel: CancellationToken,
    ) -> Result<FetchStream<S::Record>, PipelineError> {
        let first = Page::first(page_size)
            .ok_or_else(|| PipelineError::config("page size must be greater than zero"))?;

        let (data_tx, data_rx) = mpsc::channel(self.config.buffer_size(page_size));
        let (error_tx, error_rx) = mpsc::channel(1);

        let task = FetchTask {
            source: Arc::clone(&self.source),
            query,
            retry: self.config.retry,
            events: Arc::clone(&self.events),
            data_tx,
            error_tx,
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(task.run(first));

        Ok(FetchStream {
            data: data_rx,
            errors: error_rx,
            cancel,
            handle,
        })
    }
}

struct FetchTask<S: PageSource> {
    source: Arc<S>,
    query: SearchQuery,
    retry: RetryPolicy,
    events: Arc<dyn PipelineEvents>,
    data_tx: mpsc::Sender<StreamItem<S::Record>>,
    error_tx: mpsc::Sender<SourceError>,
    cancel: CancellationToken,
}

impl<S> FetchTask<S>
where
    S: PageSource + 'static,
{
    #[instrument(skip(self), fields(page_size = first.size))]
    async fn run(self, first: Page) {
        let mut page = first;
        let mut total: u64 = 0;

        loop {
            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(offset = page.offset, "Fetch cancelled");
                    return;
                }
                result = self.fetch_with_retry(page) => result,
            };

            let records = match fetched {
                Ok(records) => records,
                Err(e) => {
                    self.events.fetch_failed(page, &e);
                    // Capacity 1 and a single send, so this never blocks.
                    let _ = self.error_tx.try_send(e);
                    return;
                }
            };

            self.events.page_fetched(page, records.len());

            if records.is_empty() {
                info!(total, "Reached end of results");
                self.send(StreamItem::EndOfStream).await;
                return;
            }

            let returned = records.len() as u64;
            for record in records {
                if !self.send(StreamItem::Data(record)).await {
                    return;
                }
            }
            total += returned;
            page = page.advance(returned);
        }
    }

    /// Send one item, giving up if the pipeline is cancelled or the receiver
    /// went away. Returns whether the item was delivered.
    async fn send(&self, item: StreamItem<S::Record>) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Fetch cancelled while sending");
                false
            }
            sent = self.data_tx.send(item) => {
                if sent.is_err() {
                    debug!("Data receiver dropped, stopping fetch");
                }
                sent.is_ok()
            }
        }
    }

    async fn fetch_with_retry(&self, page: Page) -> Result<Vec<S::Record>, SourceError> {
        let mut attempt = 0;
        loop {
            match self.source.fetch_page(&self.query, page).await {
                Ok(records) => {
                    if attempt > 0 {
                        info!(attempt, offset = page.offset, "Page fetch succeeded after retry");
                    }
                    return Ok(records);
                }
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        attempt,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Page fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves `total` sequential integers, `page.size` at a time.
    struct CountingSource {
        total: u64,
        calls: AtomicUsize,
        offsets: Mutex<Vec<u64>>,
    }

    impl CountingSource {
        fn new(total: u64) -> Self {
            Self {
                total,
                calls: AtomicUsize::new(0),
                offsets: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageSource for CountingSource {
        type Record = u64;

        async fn fetch_page(&self, _query: &SearchQuery, page: Page) -> Result<Vec<u64>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.offsets.lock().unwrap().push(page.offset);
            let end = (page.offset + page.size - 1).min(self.total);
            Ok((page.offset..=end).collect())
        }
    }

    /// Fails with a transport error `failures` times before serving one record.
    struct FlakySource {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageSource for FlakySource {
        type Record = u64;

        async fn fetch_page(&self, _query: &SearchQuery, page: Page) -> Result<Vec<u64>, SourceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(SourceError::transport("connection reset"));
            }
            if page.offset == 1 {
                Ok(vec![1])
            } else {
                Ok(vec![])
            }
        }
    }

    async fn collect<T>(stream: &mut FetchStream<T>) -> (Vec<T>, bool) {
        let mut records = Vec::new();
        while let Some(item) = stream.data.recv().await {
            match item {
                StreamItem::Data(r) => records.push(r),
                StreamItem::EndOfStream => return (records, true),
            }
        }
        (records, false)
    }

    #[tokio::test]
    async fn test_streams_all_records_then_end_marker() {
        let source = Arc::new(CountingSource::new(25));
        let config = FetcherConfig {
            page_size: 10,
            ..Default::default()
        };
        let fetcher = PaginatedFetcher::with_config(Arc::clone(&source), config);

        let mut stream = fetcher
            .stream(SearchQuery::new(), CancellationToken::new())
            .unwrap();
        let (records, ended) = collect(&mut stream).await;

        assert!(ended);
        assert_eq!(records, (1..=25).collect::<Vec<_>>());
        // ceil(25 / 10) pages with data plus the terminating empty page
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert_eq!(*source.offsets.lock().unwrap(), vec![1, 11, 21, 26]);
        assert!(stream.errors.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_empty_source_emits_only_end_marker() {
        let source = Arc::new(CountingSource::new(0));
        let fetcher = PaginatedFetcher::new(Arc::clone(&source));

        let mut stream = fetcher
            .stream(SearchQuery::new(), CancellationToken::new())
            .unwrap();
        let (records, ended) = collect(&mut stream).await;

        assert!(ended);
        assert!(records.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_page_size_is_rejected() {
        let fetcher = PaginatedFetcher::new(CountingSource::new(5));
        let result =
            fetcher.stream_with_page_size(SearchQuery::new(), 0, CancellationToken::new());
        assert!(matches!(result, Err(PipelineError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_huge_page_size_streams_normally() {
        let fetcher = PaginatedFetcher::new(CountingSource::new(3));
        let mut stream = fetcher
            .stream_with_page_size(SearchQuery::new(), 1 << 62, CancellationToken::new())
            .unwrap();
        let (records, ended) = collect(&mut stream).await;

        assert!(ended);
        assert_eq!(records, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failure_without_retry_reports_single_error() {
        let source = Arc::new(FlakySource {
            failures: 1,
            calls: AtomicUsize::new(0),
        });
        let fetcher = PaginatedFetcher::new(Arc::clone(&source));

        let mut stream = fetcher
            .stream(SearchQuery::new(), CancellationToken::new())
            .unwrap();
        let (records, ended) = collect(&mut stream).await;

        assert!(!ended);
        assert!(records.is_empty());
        assert_eq!(
            stream.errors.recv().await,
            Some(SourceError::transport("connection reset"))
        );
        assert_eq!(stream.errors.recv().await, None);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_policy_recovers_transport_errors() {
        let source = Arc::new(FlakySource {
            failures: 2,
            calls: AtomicUsize::new(0),
        });
        let config = FetcherConfig {
            retry: RetryPolicy::exponential(3, Duration::from_millis(10), Duration::from_millis(100)),
            ..Default::default()
        };
        let fetcher = PaginatedFetcher::with_config(Arc::clone(&source), config);

        let mut stream = fetcher
            .stream(SearchQuery::new(), CancellationToken::new())
            .unwrap();
        let (records, ended) = collect(&mut stream).await;

        assert!(ended);
        assert_eq!(records, vec![1]);
        // two failures, one success, one empty page
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_cancel_unblocks_fetcher_on_full_channel() {
        let source = Arc::new(CountingSource::new(u64::MAX));
        let config = FetcherConfig {
            page_size: 5,
            buffer_multiplier: 1,
            ..Default::default()
        };
        let fetcher = PaginatedFetcher::with_config(Arc::clone(&source), config);

        let stream = fetcher
            .stream(SearchQuery::new(), CancellationToken::new())
            .unwrap();

        // Nobody reads, so the task parks on the full data channel.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!stream.handle.is_finished());

        stream.cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), stream.handle)
            .await
            .expect("fetch task did not stop after cancel")
            .unwrap();
        assert!(source.calls.load(Ordering::SeqCst) <= 2);
    }
}
