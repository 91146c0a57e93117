//! Command line configuration, logging and signal handling for the tools.

mod args;
mod logging;
mod shutdown;

pub use args::{
    DestinationArgs, FixMediaFlagsArgs, LegacySourceArgs, LoggingArgs, MigrateAssetFoldersArgs,
    RetryArgs, VidispineArgs,
};
pub use logging::{init_tracing, LogFormat};
pub use shutdown::shutdown_on_ctrl_c;
