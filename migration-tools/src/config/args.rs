//! Command line arguments.
//!
//! Every flag can also be set from the environment, and a `.env` file is
//! loaded before parsing.

use std::time::Duration;

use clap::{ArgAction, Args, Parser};

use super::logging::LogFormat;
use migration_pipeline::{FetcherConfig, RetryPolicy};
use migration_repository::postgres::DatabaseConfig;
use migration_repository::vidispine::VidispineConfig;

/// Default Vidispine base uri.
const DEFAULT_VS_BASE: &str = "http://localhost:8080";

/// Default destination database name.
const DEFAULT_DEST_DB: &str = "projectlocker";

/// Vidispine connection flags.
#[derive(Args, Debug, Clone)]
pub struct VidispineArgs {
    /// Vidispine base uri
    #[arg(long = "vs-base", env = "VS_BASE", default_value = DEFAULT_VS_BASE)]
    pub vs_base: String,

    /// Vidispine username
    #[arg(long = "vs-user", env = "VS_USER", default_value = "admin")]
    pub vs_user: String,

    /// Vidispine password
    #[arg(long = "vs-pass", env = "VS_PASS", default_value = "", hide_env_values = true)]
    pub vs_pass: String,

    /// Use matrix-parameter paging understood by Vidispine 4 and older
    #[arg(
        long = "v4-compatible",
        env = "VS_V4_COMPATIBLE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub v4_compatible: bool,
}

impl VidispineArgs {
    pub fn to_config(&self) -> VidispineConfig {
        VidispineConfig::new(&self.vs_base, &self.vs_user, &self.vs_pass)
            .with_v4_compatible(self.v4_compatible)
    }
}

/// Destination (projectlocker) database flags.
#[derive(Args, Debug, Clone)]
pub struct DestinationArgs {
    /// Hostname (or unix socket) running the db to write to
    #[arg(long = "dest-host", env = "DEST_HOST", default_value = "localhost")]
    pub dest_host: String,

    /// User to access the destination db as
    #[arg(long = "dest-user", env = "DEST_USER", default_value = "postgres")]
    pub dest_user: String,

    /// Password for the destination database
    #[arg(long = "dest-passwd", env = "DEST_PASSWD", default_value = "", hide_env_values = true)]
    pub dest_passwd: String,

    /// Name of the destination database
    #[arg(long = "dest-db", env = "DEST_DB", default_value = DEFAULT_DEST_DB)]
    pub dest_db: String,

    /// Don't use SSL when connecting to databases
    #[arg(long = "db-nossl", env = "DB_NOSSL")]
    pub db_nossl: bool,
}

impl DestinationArgs {
    pub fn to_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.dest_host, &self.dest_user, &self.dest_passwd)
            .with_database(&self.dest_db)
            .with_no_ssl(self.db_nossl)
    }
}

/// Legacy (asset folder) database flags.
#[derive(Args, Debug, Clone)]
pub struct LegacySourceArgs {
    /// Postgres host to read from
    #[arg(long = "source-host", env = "SOURCE_HOST", default_value = "localhost")]
    pub source_host: String,

    /// User to access the source db as
    #[arg(long = "source-user", env = "SOURCE_USER", default_value = "postgres")]
    pub source_user: String,

    /// Password for the source database
    #[arg(long = "source-passwd", env = "SOURCE_PASSWD", default_value = "", hide_env_values = true)]
    pub source_passwd: String,

    /// Name of the source database; the server default when omitted
    #[arg(long = "source-db", env = "SOURCE_DB")]
    pub source_db: Option<String>,
}

impl LegacySourceArgs {
    pub fn to_config(&self, no_ssl: bool) -> DatabaseConfig {
        let config = DatabaseConfig::new(&self.source_host, &self.source_user, &self.source_passwd)
            .with_no_ssl(no_ssl);
        match &self.source_db {
            Some(db) => config.with_database(db),
            None => config,
        }
    }
}

/// Page request retry flags. Retries are off unless `--max-retries` is set.
#[derive(Args, Debug, Clone)]
pub struct RetryArgs {
    /// Retries for a page request that failed to reach the source
    #[arg(long = "max-retries", env = "MAX_RETRIES", default_value_t = 0)]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    #[arg(long = "retry-delay-ms", env = "RETRY_DELAY_MS", default_value_t = 100)]
    pub retry_delay_ms: u64,

    /// Upper bound for the retry delay, in milliseconds
    #[arg(long = "max-retry-delay-ms", env = "MAX_RETRY_DELAY_MS", default_value_t = 5000)]
    pub max_retry_delay_ms: u64,
}

impl RetryArgs {
    pub fn policy(&self) -> RetryPolicy {
        if self.max_retries == 0 {
            return RetryPolicy::none();
        }
        RetryPolicy::exponential(
            self.max_retries,
            Duration::from_millis(self.retry_delay_ms),
            Duration::from_millis(self.max_retry_delay_ms),
        )
    }
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    /// Log line format
    #[arg(long = "log-format", env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Copies storage-rule flags from Vidispine project collections onto the
/// matching projectlocker entries.
#[derive(Parser, Debug, Clone)]
#[command(name = "fix-media-flags", version)]
pub struct FixMediaFlagsArgs {
    #[command(flatten)]
    pub vidispine: VidispineArgs,

    #[command(flatten)]
    pub destination: DestinationArgs,

    /// Number of records to get at once
    #[arg(long = "page-size", env = "PAGE_SIZE", default_value_t = 100)]
    pub page_size: u64,

    #[command(flatten)]
    pub retry: RetryArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl FixMediaFlagsArgs {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            page_size: self.page_size,
            retry: self.retry.policy(),
            ..Default::default()
        }
    }
}

/// Records the asset folders of the legacy system against projectlocker
/// project entries.
#[derive(Parser, Debug, Clone)]
#[command(name = "migrate-old-assetfolders", version)]
pub struct MigrateAssetFoldersArgs {
    #[command(flatten)]
    pub source: LegacySourceArgs,

    #[command(flatten)]
    pub destination: DestinationArgs,

    /// Vidispine site identifier
    #[arg(long = "vs-site", env = "VS_SITE", default_value = "VX")]
    pub vs_site: String,

    /// Number of rows to read at once
    #[arg(long = "page-size", env = "PAGE_SIZE", default_value_t = 20)]
    pub page_size: u64,

    /// Log the insert statements instead of executing them
    #[arg(long = "dry-run", env = "DRY_RUN")]
    pub dry_run: bool,

    #[command(flatten)]
    pub retry: RetryArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl MigrateAssetFoldersArgs {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            page_size: self.page_size,
            retry: self.retry.policy(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_media_flags_defaults() {
        let args = FixMediaFlagsArgs::try_parse_from(["fix-media-flags"]).unwrap();

        assert_eq!(args.vidispine.vs_base, "http://localhost:8080");
        assert!(args.vidispine.v4_compatible);
        assert_eq!(args.page_size, 100);
        assert_eq!(args.destination.dest_db, "projectlocker");
        assert_eq!(args.fetcher_config().retry, RetryPolicy::none());
    }

    #[test]
    fn test_fix_media_flags_overrides() {
        let args = FixMediaFlagsArgs::try_parse_from([
            "fix-media-flags",
            "--vs-base",
            "https://vs.example.com",
            "--v4-compatible",
            "false",
            "--page-size",
            "25",
            "--db-nossl",
            "--max-retries",
            "3",
        ])
        .unwrap();

        let vs = args.vidispine.to_config();
        assert_eq!(vs.base_url, "https://vs.example.com");
        assert!(!vs.v4_compatible);
        assert!(args.destination.to_config().no_ssl);

        let fetcher = args.fetcher_config();
        assert_eq!(fetcher.page_size, 25);
        assert_eq!(fetcher.retry.max_retries, 3);
        assert_eq!(fetcher.retry.initial_delay, Duration::from_millis(100));
    }

    #[test]
    fn test_migrate_asset_folders_defaults() {
        let args = MigrateAssetFoldersArgs::try_parse_from(["migrate-old-assetfolders"]).unwrap();

        assert_eq!(args.vs_site, "VX");
        assert_eq!(args.page_size, 20);
        assert!(!args.dry_run);
        assert_eq!(args.source.to_config(false).database, None);
        assert_eq!(args.logging.log_format, LogFormat::Text);
    }

    #[test]
    fn test_log_format_json() {
        let args = MigrateAssetFoldersArgs::try_parse_from([
            "migrate-old-assetfolders",
            "--log-format",
            "json",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.logging.log_format, LogFormat::Json);
        assert!(args.dry_run);
    }
}
