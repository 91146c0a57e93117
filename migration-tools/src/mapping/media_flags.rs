//! Storage-rule flags of Vidispine project collections.

use tracing::debug;

use migration_repository::vidispine::VidispineCollection;
use migration_repository::TransformError;
use migration_shared::{ProjectFlags, SearchQuery};

const SENSITIVE_FIELD: &str = "gnm_storage_rule_sensitive";
const DELETABLE_FIELD: &str = "gnm_storage_rule_deletable";
const DEEP_ARCHIVE_FIELD: &str = "gnm_storage_rule_deep_archive";

const SENSITIVE_VALUE: &str = "storage_rule_sensitive";
const DELETABLE_VALUE: &str = "storage_rule_deletable";
const DEEP_ARCHIVE_VALUE: &str = "storage_rule_deep_archive";

/// Search for every project collection.
pub fn project_search_query() -> SearchQuery {
    SearchQuery::new().with_field("gnm_type", ["project"])
}

/// Derive the storage-rule flags of a project collection.
///
/// A flag is set when its rule value appears at least once in the default
/// timespan. Without a default timespan every flag is false.
pub fn project_flags(collection: VidispineCollection) -> Result<ProjectFlags, TransformError> {
    if collection.id.is_empty() {
        return Err(TransformError::mapping(format!(
            "collection '{}' has no id",
            collection.name
        )));
    }

    let Some(timespan) = collection.metadata.default_timespan() else {
        debug!(vs_id = %collection.id, "No default timespan, clearing all flags");
        return Ok(ProjectFlags {
            vs_id: collection.id,
            ..Default::default()
        });
    };

    let sensitive = timespan.count_matches(SENSITIVE_FIELD, SENSITIVE_VALUE);
    let deletable = timespan.count_matches(DELETABLE_FIELD, DELETABLE_VALUE);
    let deep_archive = timespan.count_matches(DEEP_ARCHIVE_FIELD, DEEP_ARCHIVE_VALUE);

    debug!(
        vs_id = %collection.id,
        name = %collection.name,
        sensitive,
        deletable,
        deep_archive,
        "Counted storage rule matches"
    );

    Ok(ProjectFlags {
        vs_id: collection.id.clone(),
        sensitive: sensitive > 0,
        deletable: deletable > 0,
        deep_archive: deep_archive > 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(json: &str) -> VidispineCollection {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_flags_from_default_timespan() {
        let project = collection(
            r#"{
                "id": "VX-12",
                "name": "Election night",
                "metadata": {
                    "timespan": [{
                        "start": "-INF",
                        "end": "+INF",
                        "field": [
                            {"name": "gnm_storage_rule_sensitive", "value": [{"value": "storage_rule_sensitive"}]},
                            {"name": "gnm_storage_rule_deletable", "value": [{"value": "something_else"}]}
                        ],
                        "group": [{
                            "name": "Storage",
                            "field": [
                                {"name": "gnm_storage_rule_deep_archive", "value": [{"value": "storage_rule_deep_archive"}]}
                            ]
                        }]
                    }]
                }
            }"#,
        );

        let flags = project_flags(project).unwrap();
        assert_eq!(
            flags,
            ProjectFlags {
                vs_id: "VX-12".to_string(),
                sensitive: true,
                deletable: false,
                deep_archive: true,
            }
        );
    }

    #[test]
    fn test_missing_default_timespan_clears_flags() {
        let project = collection(
            r#"{
                "id": "VX-13",
                "name": "Clip",
                "metadata": {
                    "timespan": [{
                        "start": "0",
                        "end": "100",
                        "field": [
                            {"name": "gnm_storage_rule_sensitive", "value": [{"value": "storage_rule_sensitive"}]}
                        ]
                    }]
                }
            }"#,
        );

        let flags = project_flags(project).unwrap();
        assert_eq!(flags.vs_id, "VX-13");
        assert!(!flags.sensitive && !flags.deletable && !flags.deep_archive);
    }

    #[test]
    fn test_collection_without_id_is_rejected() {
        let project = collection(r#"{"id": "", "name": "Orphan"}"#);
        assert!(matches!(
            project_flags(project),
            Err(TransformError::Mapping(_))
        ));
    }

    #[test]
    fn test_project_search_query() {
        let query = project_search_query();
        assert_eq!(query.values("gnm_type"), Some(&["project".to_string()][..]));
    }
}
