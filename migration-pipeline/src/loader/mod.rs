//! Loader module for the migration pipeline.
//!
//! The sink task drains transformed records into a [`RecordWriter`].

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::events::{PipelineEvents, TracingEvents};
use migration_repository::{RecordWriter, WriteError};
use migration_shared::StreamItem;

/// Handle on a running sink task.
///
/// If the sink fails, its error is placed on `errors` before `done` fires, so
/// a caller that waited for `done` can check `errors` without racing.
#[derive(Debug)]
pub struct SinkHandle {
    /// Fires once the sink has stopped for any reason.
    pub done: oneshot::Receiver<()>,
    /// At most one write error.
    pub errors: mpsc::Receiver<WriteError>,
    /// Stops the sink at its next receive or write.
    pub cancel: CancellationToken,
    /// The sink task; yields the number of records written.
    pub handle: JoinHandle<u64>,
}

/// Writes every record received on its input channel.
///
/// The sink is responsible for:
/// - Writing records one at a time, in arrival order
/// - Stopping at the end-of-stream marker, a closed input or cancellation
/// - Stopping at the first write error and reporting it
pub struct Sink<W> {
    writer: W,
    events: Arc<dyn PipelineEvents>,
}

impl<W> Sink<W> {
    /// Create a sink around a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            events: Arc::new(TracingEvents),
        }
    }

    /// Report progress to `events` instead of the default tracing sink.
    pub fn with_events(mut self, events: Arc<dyn PipelineEvents>) -> Self {
        self.events = events;
        self
    }

    /// Create the bounded input channel for a sink.
    pub fn channel<T>(
        capacity: usize,
    ) -> (mpsc::Sender<StreamItem<T>>, mpsc::Receiver<StreamItem<T>>) {
        mpsc::channel(capacity.max(1))
    }

    /// Spawn the sink task reading from `input`.
    pub fn drain<T>(
        self,
        input: mpsc::Receiver<StreamItem<T>>,
        cancel: CancellationToken,
    ) -> SinkHandle
    where
        W: RecordWriter<T> + 'static,
        T: Send + Sync + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let (error_tx, error_rx) = mpsc::channel(1);

        let handle = tokio::spawn(drain_input(
            self.writer,
            self.events,
            input,
            cancel.clone(),
            error_tx,
            done_tx,
        ));

        SinkHandle {
            done: done_rx,
            errors: error_rx,
            cancel,
            handle,
        }
    }
}

#[instrument(skip_all)]
async fn drain_input<T, W>(
    mut writer: W,
    events: Arc<dyn PipelineEvents>,
    mut input: mpsc::Receiver<StreamItem<T>>,
    cancel: CancellationToken,
    error_tx: mpsc::Sender<WriteError>,
    done_tx: oneshot::Sender<()>,
) -> u64
where
    W: RecordWriter<T>,
    T: Send + Sync + 'static,
{
    let mut written: u64 = 0;

    loop {
        let item = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(written, "Sink cancelled");
                break;
            }
            item = input.recv() => item,
        };

        let record = match item {
            Some(StreamItem::Data(record)) => record,
            Some(StreamItem::EndOfStream) => {
                info!(written, "Sink reached end of stream");
                break;
            }
            None => {
                debug!(written, "Sink input closed");
                break;
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(written, "Sink cancelled during write");
                break;
            }
            result = writer.write(&record) => result,
        };

        match result {
            Ok(()) => {
                written += 1;
                events.record_written();
            }
            Err(e) => {
                events.write_failed(&e);
                let _ = error_tx.try_send(e);
                break;
            }
        }
    }

    // Stop accepting records before signalling so a blocked producer fails
    // its send instead of waiting on a sink that is gone.
    drop(input);
    let _ = done_tx.send(());
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock writer for testing.
    struct MockWriter {
        written: Arc<Mutex<Vec<u32>>>,
        calls: Arc<AtomicUsize>,
        fail_on: Option<u32>,
    }

    impl MockWriter {
        fn new() -> Self {
            Self {
                written: Arc::new(Mutex::new(Vec::new())),
                calls: Arc::new(AtomicUsize::new(0)),
                fail_on: None,
            }
        }

        fn failing_on(record: u32) -> Self {
            Self {
                fail_on: Some(record),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl RecordWriter<u32> for MockWriter {
        async fn write(&mut self, record: &u32) -> Result<(), WriteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(*record) {
                return Err(WriteError::rejected(format!("record {}", record)));
            }
            self.written.lock().unwrap().push(*record);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_writes_until_end_of_stream() {
        let writer = MockWriter::new();
        let written = Arc::clone(&writer.written);
        let (tx, rx) = Sink::<MockWriter>::channel(10);
        let mut handle = Sink::new(writer).drain(rx, CancellationToken::new());

        for n in 1..=3 {
            tx.send(StreamItem::Data(n)).await.unwrap();
        }
        tx.send(StreamItem::EndOfStream).await.unwrap();

        handle.done.await.unwrap();
        assert!(handle.errors.try_recv().is_err());
        assert_eq!(handle.handle.await.unwrap(), 3);
        assert_eq!(*written.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_write_error_is_reported_before_done() {
        let writer = MockWriter::failing_on(2);
        let calls = Arc::clone(&writer.calls);
        let (tx, rx) = Sink::<MockWriter>::channel(10);
        let mut handle = Sink::new(writer).drain(rx, CancellationToken::new());

        for n in 1..=4 {
            let _ = tx.send(StreamItem::Data(n)).await;
        }

        handle.done.await.unwrap();
        assert!(matches!(
            handle.errors.try_recv(),
            Ok(WriteError::Rejected(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // input is closed once the sink stops
        assert!(tx.send(StreamItem::Data(5)).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_stops_idle_sink() {
        let (_tx, rx) = Sink::<MockWriter>::channel::<u32>(10);
        let cancel = CancellationToken::new();
        let handle = Sink::new(MockWriter::new()).drain(rx, cancel.clone());

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle.done)
            .await
            .expect("sink did not stop after cancel")
            .unwrap();
        assert_eq!(handle.handle.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_input_stops_sink() {
        let (tx, rx) = Sink::<MockWriter>::channel(10);
        let handle = Sink::new(MockWriter::new()).drain(rx, CancellationToken::new());

        tx.send(StreamItem::Data(7)).await.unwrap();
        drop(tx);

        handle.done.await.unwrap();
        assert_eq!(handle.handle.await.unwrap(), 1);
    }
}
