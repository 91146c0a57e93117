//! Records legacy asset folders against projectlocker project entries.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use migration_tools::config::MigrateAssetFoldersArgs;
use migration_tools::{init_tracing, migrate_old_assetfolders};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = MigrateAssetFoldersArgs::parse();
    init_tracing(args.logging.log_format);

    let outcome = migrate_old_assetfolders(&args).await?;
    if outcome.is_success() {
        info!(%outcome, "All done");
    } else {
        error!(%outcome, "Migration did not complete");
    }
    std::process::exit(outcome.exit_code());
}
