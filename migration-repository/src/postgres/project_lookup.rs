//! Project id lookup against the destination project table.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::TransformError;
use crate::interfaces::ProjectIdLookup;

const SELECT_PROJECT_ID: &str =
    r#"SELECT id::bigint FROM "ProjectEntry" WHERE s_vidispine_id = $1"#;

/// Looks up `ProjectEntry.id` by Vidispine id.
#[derive(Debug, Clone)]
pub struct PgProjectLookup {
    pool: PgPool,
}

impl PgProjectLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectIdLookup for PgProjectLookup {
    async fn find_project_id(&self, vidispine_id: &str) -> Result<Option<i64>, TransformError> {
        sqlx::query_scalar::<_, i64>(SELECT_PROJECT_ID)
            .bind(vidispine_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TransformError::lookup(format!("{}: {}", vidispine_id, e)))
    }
}
