//! Database connection pool management.

use crate::config::DatabaseConfig;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// Which set of tables a migration run creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationSet {
    /// Exams, users and courses.
    Default,
    /// Notes.
    Notes,
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DatabasePool {
    name: String,
    pool: PgPool,
}

impl DatabasePool {
    /// Creates a new database pool for a named connection.
    ///
    /// # Arguments
    /// * `name` - Connection name, used in logs
    /// * `config` - Connection settings
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn new(name: &str, config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        info!(connection = name, "Database connection pool established");

        Ok(Self {
            name: name.to_string(),
            pool,
        })
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs one set of embedded migrations.
    ///
    /// Both sets may target the same database, so versions applied by the
    /// other set are tolerated.
    ///
    /// # Errors
    /// Returns an error if migrations fail.
    pub async fn run_migrations(&self, set: MigrationSet) -> Result<(), sqlx::migrate::MigrateError> {
        let mut migrator = match set {
            MigrationSet::Default => sqlx::migrate!("./migrations/default"),
            MigrationSet::Notes => sqlx::migrate!("./migrations/notes"),
        };
        migrator.set_ignore_missing(true);
        migrator.run(&self.pool).await?;
        info!(connection = %self.name, set = ?set, "Database migrations completed");
        Ok(())
    }
}
