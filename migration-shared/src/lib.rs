//! # Migration Shared
//!
//! Plain data types shared by the migration repository, pipeline and tool
//! crates. Nothing in here performs I/O.

mod page;
mod query;
mod records;
mod stream;

pub use page::Page;
pub use query::SearchQuery;
pub use records::{AssetFolderLink, LegacyAssetFolder, ProjectFlags};
pub use stream::StreamItem;
