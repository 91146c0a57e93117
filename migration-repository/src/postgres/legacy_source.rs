//! Paginated reader over the legacy asset-folder table.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::errors::SourceError;
use crate::interfaces::PageSource;
use migration_shared::{LegacyAssetFolder, Page, SearchQuery};

const SELECT_ASSET_FOLDERS: &str = r#"SELECT project_id::bigint, asset_folder_path FROM "gnm_asset_folder_assetfolder" ORDER BY project_id LIMIT $1 OFFSET $2"#;

/// Reads `gnm_asset_folder_assetfolder` one page at a time, ordered by project id.
///
/// The table has no query language, so the `SearchQuery` is ignored.
#[derive(Debug, Clone)]
pub struct LegacyAssetFolderSource {
    pool: PgPool,
}

impl LegacyAssetFolderSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PageSource for LegacyAssetFolderSource {
    type Record = LegacyAssetFolder;

    async fn fetch_page(
        &self,
        _query: &SearchQuery,
        page: Page,
    ) -> Result<Vec<LegacyAssetFolder>, SourceError> {
        let (limit, offset) = sql_bounds(page)?;

        let rows: Vec<(i64, String)> = sqlx::query_as(SELECT_ASSET_FOLDERS)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        debug!(offset = page.offset, returned = rows.len(), "Read legacy asset folders");

        Ok(rows
            .into_iter()
            .map(|(project_id, asset_folder_path)| LegacyAssetFolder {
                project_id,
                asset_folder_path,
            })
            .collect())
    }
}

/// `LIMIT` and `OFFSET` for `page`, which PostgreSQL takes as `bigint`.
fn sql_bounds(page: Page) -> Result<(i64, i64), SourceError> {
    let limit = i64::try_from(page.size)
        .map_err(|_| SourceError::decode(format!("Page size {} out of range", page.size)))?;
    let offset = i64::try_from(page.zero_based_offset())
        .map_err(|_| SourceError::decode(format!("Offset {} out of range", page.offset)))?;
    Ok((limit, offset))
}
