//! Records moved by the migration tools.

use serde::{Deserialize, Serialize};

/// Storage-rule flags for one project, keyed by its Vidispine collection id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFlags {
    /// Vidispine collection id, e.g. `VX-1234`.
    pub vs_id: String,
    pub sensitive: bool,
    pub deletable: bool,
    pub deep_archive: bool,
}

/// A row of the legacy `gnm_asset_folder_assetfolder` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyAssetFolder {
    /// Numeric part of the Vidispine project id.
    pub project_id: i64,
    pub asset_folder_path: String,
}

/// An asset folder resolved against the destination project table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFolderLink {
    /// Primary key of the destination `ProjectEntry` row.
    pub project_entry_id: i64,
    pub asset_folder_path: String,
}
