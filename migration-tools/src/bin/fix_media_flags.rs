//! Copies storage-rule flags from Vidispine project collections to projectlocker.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use migration_tools::config::FixMediaFlagsArgs;
use migration_tools::{fix_media_flags, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = FixMediaFlagsArgs::parse();
    init_tracing(args.logging.log_format);

    let outcome = fix_media_flags(&args).await?;
    if outcome.is_success() {
        info!(%outcome, "All done");
    } else {
        error!(%outcome, "Migration did not complete");
    }
    std::process::exit(outcome.exit_code());
}
