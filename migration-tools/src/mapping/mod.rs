//! Field mappings between the source and destination record shapes.

mod asset_folders;
mod media_flags;

pub use asset_folders::{vidispine_project_id, AssetFolderResolver};
pub use media_flags::{project_flags, project_search_query};
