//! Paginated source trait definition.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::SourceError;
use migration_shared::{Page, SearchQuery};

/// A data source that can be read one bounded page at a time.
///
/// # Contract
///
/// - `page.offset` is 1-based.
/// - Returning fewer than `page.size` records does **not** mean the result set
///   is exhausted; only an empty page does.
/// - Implementations must not retry internally. Retry policy belongs to the
///   caller.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a fetcher task can own them.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// The record type decoded from each page.
    type Record: Send + 'static;

    /// Fetch a single page of results.
    ///
    /// # Arguments
    ///
    /// * `query` - Field/value criteria; sources without a query language may ignore it
    /// * `page` - The window to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(records)` - Between zero and `page.size` records, in source order
    /// * `Err(SourceError)` - Transport or decode failure
    async fn fetch_page(
        &self,
        query: &SearchQuery,
        page: Page,
    ) -> Result<Vec<Self::Record>, SourceError>;
}

#[async_trait]
impl<S> PageSource for Arc<S>
where
    S: PageSource + ?Sized,
{
    type Record = S::Record;

    async fn fetch_page(
        &self,
        query: &SearchQuery,
        page: Page,
    ) -> Result<Vec<Self::Record>, SourceError> {
        (**self).fetch_page(query, page).await
    }
}
