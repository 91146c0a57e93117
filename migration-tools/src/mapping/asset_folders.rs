//! Resolution of legacy asset folders against projectlocker project entries.

use async_trait::async_trait;
use tracing::debug;

use migration_pipeline::RecordTransformer;
use migration_repository::{ProjectIdLookup, TransformError};
use migration_shared::{AssetFolderLink, LegacyAssetFolder};

/// The Vidispine id of a legacy project, e.g. `VX-1234`.
pub fn vidispine_project_id(site_id: &str, project_id: i64) -> String {
    format!("{}-{}", site_id, project_id)
}

/// Maps a legacy asset folder row to the destination project entry that
/// carries the same Vidispine id.
///
/// Rows whose project is missing from the destination fail to transform and
/// are dropped by the pipeline.
pub struct AssetFolderResolver<L> {
    lookup: L,
    site_id: String,
}

impl<L> AssetFolderResolver<L>
where
    L: ProjectIdLookup,
{
    pub fn new(lookup: L, site_id: impl Into<String>) -> Self {
        Self {
            lookup,
            site_id: site_id.into(),
        }
    }
}

#[async_trait]
impl<L> RecordTransformer<LegacyAssetFolder, AssetFolderLink> for AssetFolderResolver<L>
where
    L: ProjectIdLookup,
{
    async fn transform(&self, record: LegacyAssetFolder) -> Result<AssetFolderLink, TransformError> {
        let vs_id = vidispine_project_id(&self.site_id, record.project_id);

        match self.lookup.find_project_id(&vs_id).await? {
            Some(project_entry_id) => {
                debug!(vs_id = %vs_id, project_entry_id, "Resolved project entry");
                Ok(AssetFolderLink {
                    project_entry_id,
                    asset_folder_path: record.asset_folder_path,
                })
            }
            None => Err(TransformError::lookup(format!(
                "no project entry for {}",
                vs_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock lookup for testing.
    struct MockLookup {
        projects: HashMap<String, i64>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockLookup {
        fn with(projects: &[(&str, i64)]) -> Self {
            Self {
                projects: projects
                    .iter()
                    .map(|(vs_id, id)| (vs_id.to_string(), *id))
                    .collect(),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl ProjectIdLookup for MockLookup {
        async fn find_project_id(&self, vidispine_id: &str) -> Result<Option<i64>, TransformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TransformError::lookup("connection closed"));
            }
            Ok(self.projects.get(vidispine_id).copied())
        }
    }

    fn folder(project_id: i64) -> LegacyAssetFolder {
        LegacyAssetFolder {
            project_id,
            asset_folder_path: format!("/srv/Assets/wg/comm/project_{}", project_id),
        }
    }

    #[test]
    fn test_vidispine_project_id() {
        assert_eq!(vidispine_project_id("VX", 1234), "VX-1234");
        assert_eq!(vidispine_project_id("KP", 7), "KP-7");
    }

    #[tokio::test]
    async fn test_resolves_known_project() {
        let resolver = AssetFolderResolver::new(MockLookup::with(&[("VX-42", 9)]), "VX");

        let link = resolver.transform(folder(42)).await.unwrap();
        assert_eq!(
            link,
            AssetFolderLink {
                project_entry_id: 9,
                asset_folder_path: "/srv/Assets/wg/comm/project_42".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_project_is_lookup_error() {
        let resolver = AssetFolderResolver::new(MockLookup::with(&[("VX-42", 9)]), "KP");

        let result = resolver.transform(folder(42)).await;
        assert!(matches!(result, Err(TransformError::Lookup(_))));
        assert_eq!(resolver.lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut lookup = MockLookup::with(&[]);
        lookup.fail = true;
        let resolver = AssetFolderResolver::new(lookup, "VX");

        assert!(resolver.transform(folder(1)).await.is_err());
    }
}
