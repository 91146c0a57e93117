//! Destination writers.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::errors::WriteError;
use crate::interfaces::RecordWriter;
use migration_shared::{AssetFolderLink, ProjectFlags};

const UPDATE_PROJECT_FLAGS: &str = r#"UPDATE "ProjectEntry" SET b_deeparchive = $1, b_sensitive = $2, b_deletable = $3 WHERE s_vidispine_id = $4"#;

const INSERT_ASSET_FOLDER: &str = r#"INSERT INTO "ProjectMetadata" (k_project_entry, s_key, s_value) VALUES ($1, $2, $3)"#;

/// Metadata key under which the asset folder path is stored.
pub const ASSET_FOLDER_KEY: &str = "created_asset_folder";

/// Writes storage-rule flags onto existing `ProjectEntry` rows.
#[derive(Debug, Clone)]
pub struct ProjectFlagsWriter {
    pool: PgPool,
}

impl ProjectFlagsWriter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordWriter<ProjectFlags> for ProjectFlagsWriter {
    async fn write(&mut self, record: &ProjectFlags) -> Result<(), WriteError> {
        let result = sqlx::query(UPDATE_PROJECT_FLAGS)
            .bind(record.deep_archive)
            .bind(record.sensitive)
            .bind(record.deletable)
            .bind(&record.vs_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(vs_id = %record.vs_id, "No project entry matched");
        } else {
            debug!(vs_id = %record.vs_id, "Updated project flags");
        }
        Ok(())
    }
}

/// Records the asset folder of a project in `ProjectMetadata`.
///
/// In dry-run mode the statement is logged instead of executed.
#[derive(Debug, Clone)]
pub struct AssetFolderWriter {
    pool: PgPool,
    dry_run: bool,
}

impl AssetFolderWriter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// The insert statement with its arguments substituted, for dry-run logging.
pub(crate) fn render_insert(record: &AssetFolderLink) -> String {
    INSERT_ASSET_FOLDER
        .replace("$1", &record.project_entry_id.to_string())
        .replace("$2", &format!("'{}'", ASSET_FOLDER_KEY))
        .replace("$3", &format!("'{}'", record.asset_folder_path))
}

#[async_trait]
impl RecordWriter<AssetFolderLink> for AssetFolderWriter {
    async fn write(&mut self, record: &AssetFolderLink) -> Result<(), WriteError> {
        if self.dry_run {
            info!(statement = %render_insert(record), "Dry run, not executing");
            return Ok(());
        }

        sqlx::query(INSERT_ASSET_FOLDER)
            .bind(record.project_entry_id)
            .bind(ASSET_FOLDER_KEY)
            .bind(&record.asset_folder_path)
            .execute(&self.pool)
            .await?;

        debug!(
            project_entry_id = record.project_entry_id,
            path = %record.asset_folder_path,
            "Recorded asset folder"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_insert_substitutes_arguments() {
        let record = AssetFolderLink {
            project_entry_id: 42,
            asset_folder_path: "/srv/Assets/wg/comm/proj".to_string(),
        };
        assert_eq!(
            render_insert(&record),
            r#"INSERT INTO "ProjectMetadata" (k_project_entry, s_key, s_value) VALUES (42, 'created_asset_folder', '/srv/Assets/wg/comm/proj')"#
        );
    }
}
