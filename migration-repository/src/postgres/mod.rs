//! PostgreSQL implementations for the legacy and destination databases.
//!
//! The legacy asset-folder table is exposed as a `PageSource`, the project
//! table lookup as a `ProjectIdLookup`, and the two destination updates as
//! `RecordWriter`s.

mod config;
mod legacy_source;
mod project_lookup;
mod writers;

pub use config::DatabaseConfig;
pub use legacy_source::LegacyAssetFolderSource;
pub use project_lookup::PgProjectLookup;
pub use writers::{AssetFolderWriter, ProjectFlagsWriter};
