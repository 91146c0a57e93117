//! Connection settings for the PostgreSQL databases.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, instrument};

/// Where and how to connect to one PostgreSQL database.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Hostname, or a unix socket directory.
    pub host: String,
    pub user: String,
    pub password: String,
    /// Database name; the server default when `None`.
    pub database: Option<String>,
    /// Connect without TLS.
    pub no_ssl: bool,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("no_ssl", &self.no_ssl)
            .finish_non_exhaustive()
    }
}

impl DatabaseConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database: None,
            no_ssl: false,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_no_ssl(mut self, no_ssl: bool) -> Self {
        self.no_ssl = no_ssl;
        self
    }

    /// Build sqlx connect options.
    ///
    /// TLS is preferred unless `no_ssl` is set, in which case it is disabled.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(if self.no_ssl {
                PgSslMode::Disable
            } else {
                PgSslMode::Prefer
            });

        if let Some(ref database) = self.database {
            options = options.database(database);
        }
        options
    }

    /// Open a small connection pool.
    #[instrument(skip(self), fields(host = %self.host, user = %self.user))]
    pub async fn connect(&self, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(self.connect_options())
            .await?;

        info!(database = ?self.database, "Connected to database");
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options() {
        let config = DatabaseConfig::new("db.local", "postgres", "secret")
            .with_database("projectlocker")
            .with_no_ssl(true);
        let options = config.connect_options();

        assert_eq!(options.get_host(), "db.local");
        assert_eq!(options.get_username(), "postgres");
        assert_eq!(options.get_database(), Some("projectlocker"));
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Disable));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = DatabaseConfig::new("db.local", "postgres", "hunter2");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("db.local"));
    }
}
