//! Destination writer trait definition.

use async_trait::async_trait;

use crate::errors::WriteError;

/// Writes one record at a time to a destination.
///
/// The writer is owned exclusively by the sink task, hence `&mut self` and no
/// `Sync` bound.
#[async_trait]
pub trait RecordWriter<T>: Send
where
    T: Send + Sync,
{
    /// Write a single record.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The record was persisted
    /// * `Err(WriteError)` - The write failed; the caller will not retry it
    async fn write(&mut self, record: &T) -> Result<(), WriteError>;
}
