//! Vidispine REST client implementation.
//!
//! Every request authenticates with HTTP basic auth and asks for JSON. Search
//! requests are `PUT`s carrying an `ItemSearchDocument` XML body.

use reqwest::{header, Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::SourceError;
use crate::vidispine::config::{PageEncoding, VidispineConfig};
use crate::vidispine::item::{VidispineCollection, VidispineItem};
use crate::vidispine::search_document::search_document_xml;
use migration_shared::{Page, SearchQuery};

/// Content requested for item searches and lookups.
const ITEM_CONTENT: &str = "content=shape,metadata,file";

#[derive(Debug, Deserialize)]
struct ItemSearchResponse {
    #[serde(default)]
    item: Vec<VidispineItem>,
}

#[derive(Debug, Deserialize)]
struct CollectionSearchResponse {
    #[serde(default)]
    collection: Vec<VidispineCollection>,
}

/// Client for a single Vidispine server.
///
/// # Example
///
/// ```ignore
/// let config = VidispineConfig::new("http://localhost:8080", "admin", "secret");
/// let client = VidispineClient::new(config)?;
///
/// let query = SearchQuery::new().with_field("gnm_type", ["project"]);
/// let first_page = client
///     .collection_search(&query, Page::first(100).unwrap(), &[])
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct VidispineClient {
    http: reqwest::Client,
    base_url: Url,
    user: String,
    password: String,
    encoding: PageEncoding,
}

impl VidispineClient {
    /// Create a new client.
    ///
    /// # Returns
    ///
    /// * `Ok(VidispineClient)` - A new client instance
    /// * `Err(SourceError)` - If the base URL does not parse or the HTTP client cannot be built
    pub fn new(config: VidispineConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SourceError::transport(format!("Invalid Vidispine base URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SourceError::transport(e.to_string()))?;

        info!(
            base_url = %base_url,
            user = %config.user,
            v4_compatible = config.v4_compatible,
            "Created Vidispine client"
        );

        Ok(Self {
            http,
            base_url,
            user: config.user.clone(),
            password: config.password.clone(),
            encoding: config.page_encoding(),
        })
    }

    /// Build the URL for an API path, with an optional page window.
    pub fn request_url(&self, api_path: &str, raw_query: &str, page: Option<Page>) -> Url {
        let base_path = self.base_url.path().trim_end_matches('/');
        let path = format!("{}{}", base_path, api_path);

        let (path, query) = match page {
            Some(page) => self.encoding.apply(&path, raw_query, page),
            None => (path, raw_query.to_string()),
        };

        let mut url = self.base_url.clone();
        url.set_path(&path);
        url.set_query(if query.is_empty() { None } else { Some(&query) });
        url
    }

    async fn request(
        &self,
        method: Method,
        url: Url,
        xml_body: Option<String>,
        accept: &str,
    ) -> Result<Vec<u8>, SourceError> {
        debug!(method = %method, url = %url, "Sending Vidispine request");

        let mut builder = self
            .http
            .request(method, url.clone())
            .basic_auth(&self.user, Some(&self.password))
            .header(header::ACCEPT, accept);

        if let Some(body) = xml_body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/xml")
                .body(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(url = %url, error = %e, "Could not communicate with Vidispine");
            SourceError::transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::transport(format!("Could not read response body: {}", e)))?;

        if status != StatusCode::OK {
            let text = String::from_utf8_lossy(&body);
            error!(status = %status, body = %text, "Vidispine returned an error");
            return Err(SourceError::transport(format!(
                "Server error {}: {}",
                status.as_u16(),
                text
            )));
        }

        Ok(body.to_vec())
    }

    /// Retrieve one page of a collection search.
    ///
    /// # Arguments
    ///
    /// * `query` - Search criteria
    /// * `page` - Window to fetch
    /// * `md_fields` - Restrict returned metadata to these fields; empty for all
    #[instrument(skip(self, query, md_fields), fields(offset = page.offset, size = page.size))]
    pub async fn collection_search(
        &self,
        query: &SearchQuery,
        page: Page,
        md_fields: &[String],
    ) -> Result<Vec<VidispineCollection>, SourceError> {
        let raw_query = collection_content(md_fields);
        let url = self.request_url("/API/collection", &raw_query, Some(page));
        let body = search_document_xml(query)?;

        let bytes = self.request(Method::PUT, url, Some(body), "application/json").await?;
        decode_collection_page(&bytes)
    }

    /// Retrieve one page of an item search, including shapes and files.
    #[instrument(skip(self, query), fields(offset = page.offset, size = page.size))]
    pub async fn item_search(
        &self,
        query: &SearchQuery,
        page: Page,
    ) -> Result<Vec<VidispineItem>, SourceError> {
        let url = self.request_url("/API/item", ITEM_CONTENT, Some(page));
        let body = search_document_xml(query)?;

        let bytes = self.request(Method::PUT, url, Some(body), "application/json").await?;
        decode_item_page(&bytes)
    }

    /// Fetch a single item with its shapes, metadata and files.
    #[instrument(skip(self))]
    pub async fn lookup_item_shapes(&self, item_id: &str) -> Result<VidispineItem, SourceError> {
        let url = self.request_url(&format!("/API/item/{}", item_id), ITEM_CONTENT, None);
        let bytes = self.request(Method::GET, url, None, "application/json").await?;

        serde_json::from_slice(&bytes).map_err(|e| decode_failure(&bytes, e))
    }

    /// Download an item's metadata document in the requested content type.
    #[instrument(skip(self))]
    pub async fn metadata_document(
        &self,
        item_id: &str,
        content_type: &str,
    ) -> Result<String, SourceError> {
        let url = self.request_url(&format!("/API/item/{}/metadata", item_id), "", None);
        let bytes = self.request(Method::GET, url, None, content_type).await?;

        String::from_utf8(bytes)
            .map_err(|e| SourceError::decode(format!("Metadata is not UTF-8: {}", e)))
    }
}

fn collection_content(md_fields: &[String]) -> String {
    if md_fields.is_empty() {
        "content=metadata".to_string()
    } else {
        format!("content=metadata&field={}", md_fields.join(","))
    }
}

fn decode_failure(bytes: &[u8], err: serde_json::Error) -> SourceError {
    debug!(body = %String::from_utf8_lossy(bytes), "Offending response body");
    error!(error = %err, "Could not understand Vidispine response");
    SourceError::decode(err.to_string())
}

/// Decode a collection search response body.
pub(crate) fn decode_collection_page(bytes: &[u8]) -> Result<Vec<VidispineCollection>, SourceError> {
    serde_json::from_slice::<CollectionSearchResponse>(bytes)
        .map(|response| response.collection)
        .map_err(|e| decode_failure(bytes, e))
}

/// Decode an item search response body.
pub(crate) fn decode_item_page(bytes: &[u8]) -> Result<Vec<VidispineItem>, SourceError> {
    serde_json::from_slice::<ItemSearchResponse>(bytes)
        .map(|response| response.item)
        .map_err(|e| decode_failure(bytes, e))
}
