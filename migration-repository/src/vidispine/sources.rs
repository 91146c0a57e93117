//! `PageSource` adapters over the Vidispine searches.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::SourceError;
use crate::interfaces::PageSource;
use crate::vidispine::client::VidispineClient;
use crate::vidispine::item::{VidispineCollection, VidispineItem};
use migration_shared::{Page, SearchQuery};

/// Pages through a collection search.
#[derive(Debug, Clone)]
pub struct CollectionSearch {
    client: Arc<VidispineClient>,
    md_fields: Vec<String>,
}

impl CollectionSearch {
    /// Search collections, returning all metadata fields.
    pub fn new(client: Arc<VidispineClient>) -> Self {
        Self {
            client,
            md_fields: Vec::new(),
        }
    }

    /// Only return these metadata fields for each collection.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.md_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl PageSource for CollectionSearch {
    type Record = VidispineCollection;

    async fn fetch_page(
        &self,
        query: &SearchQuery,
        page: Page,
    ) -> Result<Vec<VidispineCollection>, SourceError> {
        self.client
            .collection_search(query, page, &self.md_fields)
            .await
    }
}

/// Pages through an item search.
#[derive(Debug, Clone)]
pub struct ItemSearch {
    client: Arc<VidispineClient>,
}

impl ItemSearch {
    pub fn new(client: Arc<VidispineClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for ItemSearch {
    type Record = VidispineItem;

    async fn fetch_page(
        &self,
        query: &SearchQuery,
        page: Page,
    ) -> Result<Vec<VidispineItem>, SourceError> {
        self.client.item_search(query, page).await
    }
}
