//! Vidispine implementation of the paginated source.
//!
//! Provides a REST client for item and collection searches, the JSON model of
//! Vidispine metadata documents, and `PageSource` adapters so either search
//! can feed the migration pipeline.

mod client;
mod config;
mod item;
mod metadata;
mod search_document;
mod sources;

pub use client::VidispineClient;
pub use config::{PageEncoding, VidispineConfig};
pub use item::{ShapeComponent, VidispineCollection, VidispineFile, VidispineItem, VidispineShape};
pub use metadata::{MetaField, MetaGroup, MetaTimespan, MetaValue, Metadata};
pub use search_document::search_document_xml;
pub use sources::{CollectionSearch, ItemSearch};
