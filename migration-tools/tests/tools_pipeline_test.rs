//! The tool mappings driven through the pipeline with in-memory backends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use migration_pipeline::{FetcherConfig, MapTransformer, Orchestrator, PaginatedFetcher, PipelineOutcome};
use migration_repository::vidispine::VidispineCollection;
use migration_repository::{
    PageSource, ProjectIdLookup, RecordWriter, SourceError, TransformError, WriteError,
};
use migration_shared::{AssetFolderLink, LegacyAssetFolder, Page, ProjectFlags, SearchQuery};
use migration_tools::mapping::{project_flags, project_search_query, AssetFolderResolver};

/// Serves a fixed record list page by page, honouring the 1-based offset.
struct VecSource<T> {
    records: Vec<T>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl<T> VecSource<T> {
    fn new(records: Vec<T>) -> Self {
        Self {
            records,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<T> PageSource for VecSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Record = T;

    async fn fetch_page(&self, query: &SearchQuery, page: Page) -> Result<Vec<T>, SourceError> {
        self.queries.lock().unwrap().push(query.clone());
        let start = page.zero_based_offset() as usize;
        Ok(self
            .records
            .iter()
            .skip(start)
            .take(page.size as usize)
            .cloned()
            .collect())
    }
}

#[derive(Clone)]
struct CollectingWriter<T> {
    written: Arc<Mutex<Vec<T>>>,
}

impl<T> CollectingWriter<T> {
    fn new() -> Self {
        Self {
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl<T> RecordWriter<T> for CollectingWriter<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn write(&mut self, record: &T) -> Result<(), WriteError> {
        self.written.lock().unwrap().push(record.clone());
        Ok(())
    }
}

struct MapLookup(HashMap<String, i64>);

#[async_trait]
impl ProjectIdLookup for MapLookup {
    async fn find_project_id(&self, vidispine_id: &str) -> Result<Option<i64>, TransformError> {
        Ok(self.0.get(vidispine_id).copied())
    }
}

fn collection(id: &str, sensitive: bool) -> VidispineCollection {
    let value = if sensitive {
        "storage_rule_sensitive"
    } else {
        "none"
    };
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("Project {}", id),
        "metadata": {
            "timespan": [{
                "start": "-INF",
                "end": "+INF",
                "field": [
                    {"name": "gnm_storage_rule_sensitive", "value": [{"value": value}]}
                ]
            }]
        }
    }))
    .unwrap()
}

fn small_pages() -> FetcherConfig {
    FetcherConfig {
        page_size: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_media_flags_pipeline() {
    let source = Arc::new(VecSource::new(vec![
        collection("VX-1", true),
        collection("", true),
        collection("VX-3", false),
    ]));
    let writer = CollectingWriter::<ProjectFlags>::new();

    let outcome = Orchestrator::new()
        .execute(
            &PaginatedFetcher::with_config(Arc::clone(&source), small_pages()),
            project_search_query(),
            &MapTransformer::new(project_flags),
            writer.clone(),
        )
        .await
        .unwrap();

    let stats = match outcome {
        PipelineOutcome::Completed(stats) => stats,
        other => panic!("expected completion, got {:?}", other),
    };
    // the collection without an id is dropped
    assert_eq!(stats.dropped, 1);

    let written = writer.written.lock().unwrap().clone();
    assert_eq!(
        written,
        vec![
            ProjectFlags {
                vs_id: "VX-1".to_string(),
                sensitive: true,
                ..Default::default()
            },
            ProjectFlags {
                vs_id: "VX-3".to_string(),
                ..Default::default()
            },
        ]
    );

    let queries = source.queries.lock().unwrap();
    assert!(queries
        .iter()
        .all(|q| q.values("gnm_type") == Some(&["project".to_string()][..])));
}

#[tokio::test]
async fn test_asset_folder_pipeline_skips_unknown_projects() {
    let legacy: Vec<LegacyAssetFolder> = (1..=5)
        .map(|project_id| LegacyAssetFolder {
            project_id,
            asset_folder_path: format!("/assets/{}", project_id),
        })
        .collect();
    let lookup = MapLookup(
        [("KP-1", 101), ("KP-2", 102), ("KP-4", 104), ("KP-5", 105)]
            .into_iter()
            .map(|(vs_id, id)| (vs_id.to_string(), id))
            .collect(),
    );
    let writer = CollectingWriter::<AssetFolderLink>::new();

    let outcome = Orchestrator::new()
        .execute(
            &PaginatedFetcher::with_config(VecSource::new(legacy), small_pages()),
            SearchQuery::new(),
            &AssetFolderResolver::new(lookup, "KP"),
            writer.clone(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.exit_code(), 0);
    let ids: Vec<i64> = writer
        .written
        .lock()
        .unwrap()
        .iter()
        .map(|link| link.project_entry_id)
        .collect();
    assert_eq!(ids, vec![101, 102, 104, 105]);
}
