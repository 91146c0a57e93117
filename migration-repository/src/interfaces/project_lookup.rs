//! Cross-system project id lookup.

use async_trait::async_trait;

use crate::errors::TransformError;

/// Resolves a Vidispine project id to the destination project's primary key.
#[async_trait]
pub trait ProjectIdLookup: Send + Sync {
    /// Look up the destination id for `vidispine_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(id))` - The project exists in the destination
    /// * `Ok(None)` - No project carries this Vidispine id
    /// * `Err(TransformError)` - The lookup itself failed
    async fn find_project_id(&self, vidispine_id: &str) -> Result<Option<i64>, TransformError>;
}
