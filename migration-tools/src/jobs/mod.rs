//! Wiring of each tool's source, transformer and writer into the pipeline.

mod asset_folders;
mod media_flags;

pub use asset_folders::migrate_old_assetfolders;
pub use media_flags::fix_media_flags;

/// Connections per database pool. The pipeline writes from a single task.
const DEFAULT_MAX_CONNECTIONS: u32 = 4;
