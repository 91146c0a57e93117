//! Record transformer implementations.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use migration_repository::TransformError;

/// Maps one source record to one destination record.
///
/// A failed transform drops that record only; the pipeline carries on with
/// the next one. Transformers may perform I/O, such as a lookup in the
/// destination database.
#[async_trait]
pub trait RecordTransformer<In, Out>: Send + Sync
where
    In: Send + 'static,
    Out: Send + 'static,
{
    /// Transform a single record.
    ///
    /// # Returns
    ///
    /// * `Ok(out)` - The record to forward to the sink
    /// * `Err(TransformError)` - The record is dropped and reported
    async fn transform(&self, record: In) -> Result<Out, TransformError>;
}

#[async_trait]
impl<In, Out, T> RecordTransformer<In, Out> for Arc<T>
where
    In: Send + 'static,
    Out: Send + 'static,
    T: RecordTransformer<In, Out> + ?Sized,
{
    async fn transform(&self, record: In) -> Result<Out, TransformError> {
        (**self).transform(record).await
    }
}

/// Wraps a synchronous mapping function.
pub struct MapTransformer<F> {
    map: F,
}

impl<F> MapTransformer<F> {
    pub fn new(map: F) -> Self {
        Self { map }
    }
}

#[async_trait]
impl<In, Out, F> RecordTransformer<In, Out> for MapTransformer<F>
where
    In: Send + 'static,
    Out: Send + 'static,
    F: Fn(In) -> Result<Out, TransformError> + Send + Sync,
{
    async fn transform(&self, record: In) -> Result<Out, TransformError> {
        (self.map)(record)
    }
}

/// Forwards every record unchanged.
pub struct PassThrough<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T> PassThrough<T> {
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> Default for PassThrough<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> RecordTransformer<T, T> for PassThrough<T>
where
    T: Send + 'static,
{
    async fn transform(&self, record: T) -> Result<T, TransformError> {
        Ok(record)
    }
}
