//! The migrate-old-assetfolders job.

use tracing::{info, instrument, warn};

use super::DEFAULT_MAX_CONNECTIONS;
use crate::config::{shutdown_on_ctrl_c, MigrateAssetFoldersArgs};
use crate::mapping::AssetFolderResolver;
use crate::ToolError;
use migration_pipeline::{Orchestrator, PaginatedFetcher, PipelineOutcome};
use migration_repository::postgres::{AssetFolderWriter, LegacyAssetFolderSource, PgProjectLookup};
use migration_shared::SearchQuery;

/// Record the asset folder of every legacy project in projectlocker's
/// project metadata.
///
/// # Returns
///
/// * `Ok(PipelineOutcome)` - The pipeline ran; the outcome carries the exit code
/// * `Err(ToolError)` - Invalid flags, or a database could not be reached
#[instrument(skip_all)]
pub async fn migrate_old_assetfolders(
    args: &MigrateAssetFoldersArgs,
) -> Result<PipelineOutcome, ToolError> {
    if args.vs_site.is_empty() {
        return Err(ToolError::config("vs-site must not be empty"));
    }

    let destination = args.destination.to_config();
    let source = args.source.to_config(destination.no_ssl);

    info!(
        source = ?source,
        destination = ?destination,
        vs_site = %args.vs_site,
        page_size = args.page_size,
        dry_run = args.dry_run,
        "Initializing dependencies"
    );

    if args.dry_run {
        warn!("Dry run: statements are logged, not executed");
    }

    let source_pool = source
        .connect(DEFAULT_MAX_CONNECTIONS)
        .await?;
    let dest_pool = destination
        .connect(DEFAULT_MAX_CONNECTIONS)
        .await?;

    info!("Database connections verified");

    let fetcher = PaginatedFetcher::with_config(
        LegacyAssetFolderSource::new(source_pool),
        args.fetcher_config(),
    );
    let resolver = AssetFolderResolver::new(PgProjectLookup::new(dest_pool.clone()), &args.vs_site);
    let writer = AssetFolderWriter::new(dest_pool).with_dry_run(args.dry_run);

    let orchestrator = Orchestrator::new();
    let signals = shutdown_on_ctrl_c(orchestrator.shutdown_token());

    let outcome = orchestrator
        .execute(&fetcher, SearchQuery::new(), &resolver, writer)
        .await?;

    signals.abort();
    Ok(outcome)
}
