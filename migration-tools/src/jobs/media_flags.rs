//! The fix-media-flags job.

use std::sync::Arc;

use tracing::{info, instrument};

use super::DEFAULT_MAX_CONNECTIONS;
use crate::config::{shutdown_on_ctrl_c, FixMediaFlagsArgs};
use crate::mapping::{project_flags, project_search_query};
use crate::ToolError;
use migration_pipeline::{MapTransformer, Orchestrator, PaginatedFetcher, PipelineOutcome};
use migration_repository::postgres::ProjectFlagsWriter;
use migration_repository::vidispine::CollectionSearch;
use migration_repository::VidispineClient;

/// Copy storage-rule flags of every Vidispine project collection onto the
/// projectlocker entry with the same Vidispine id.
///
/// # Returns
///
/// * `Ok(PipelineOutcome)` - The pipeline ran; the outcome carries the exit code
/// * `Err(ToolError)` - The Vidispine client or the database could not be set up
#[instrument(skip_all)]
pub async fn fix_media_flags(args: &FixMediaFlagsArgs) -> Result<PipelineOutcome, ToolError> {
    let vidispine = args.vidispine.to_config();
    let destination = args.destination.to_config();

    info!(
        vs_base = %vidispine.base_url,
        v4_compatible = vidispine.v4_compatible,
        destination = ?destination,
        page_size = args.page_size,
        "Initializing dependencies"
    );

    let client = VidispineClient::new(vidispine)?;
    let pool = destination
        .connect(DEFAULT_MAX_CONNECTIONS)
        .await?;

    info!("Destination database connection verified");

    let fetcher =
        PaginatedFetcher::with_config(CollectionSearch::new(Arc::new(client)), args.fetcher_config());
    let orchestrator = Orchestrator::new();
    let signals = shutdown_on_ctrl_c(orchestrator.shutdown_token());

    let outcome = orchestrator
        .execute(
            &fetcher,
            project_search_query(),
            &MapTransformer::new(project_flags),
            ProjectFlagsWriter::new(pool),
        )
        .await?;

    signals.abort();
    Ok(outcome)
}
