//! Database module for PostgreSQL connections and repositories.
//!
//! Each entity names the connection it lives on (see
//! [`crate::config::EntityConnections`]); entities naming the same connection
//! share one pool.

mod notes;
mod pool;
mod records;

pub use notes::PgNoteRepository;
pub use pool::{DatabasePool, MigrationSet};
pub use records::{PgCourseRepository, PgExamRepository, PgUserRepository};

use crate::config::Config;
use crate::repository::Repositories;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while opening the configured connections.
#[derive(Debug, Error)]
pub enum DbSetupError {
    /// An entity names a connection that is not configured.
    #[error("unknown database connection: {0}")]
    UnknownConnection(String),

    /// The connection could not be established.
    #[error("failed to connect to database {name}: {source}")]
    Connect {
        /// Connection name.
        name: String,
        /// Driver error.
        #[source]
        source: sqlx::Error,
    },

    /// Embedded migrations failed.
    #[error("migrations failed on database {name}: {source}")]
    Migrate {
        /// Connection name.
        name: String,
        /// Migration error.
        #[source]
        source: sqlx::migrate::MigrateError,
    },
}

/// Opens one pool per referenced connection and builds the repositories.
///
/// # Errors
/// Returns an error if a connection is missing, unreachable, or its
/// migrations fail.
pub async fn connect(config: &Config) -> Result<Repositories, DbSetupError> {
    let mut pools: HashMap<String, DatabasePool> = HashMap::new();
    let mut migration_sets: HashMap<String, Vec<MigrationSet>> = HashMap::new();

    for (entity, name) in config.entities.iter() {
        if !pools.contains_key(name) {
            let settings = config
                .database(name)
                .ok_or_else(|| DbSetupError::UnknownConnection(name.to_string()))?;
            let pool = DatabasePool::new(name, settings)
                .await
                .map_err(|source| DbSetupError::Connect {
                    name: name.to_string(),
                    source,
                })?;
            pools.insert(name.to_string(), pool);
        }

        let set = if entity == "notes" {
            MigrationSet::Notes
        } else {
            MigrationSet::Default
        };
        let sets = migration_sets.entry(name.to_string()).or_default();
        if !sets.contains(&set) {
            sets.push(set);
        }
    }

    if config.storage.run_migrations {
        for (name, sets) in &migration_sets {
            let pool = &pools[name];
            for set in sets {
                pool.run_migrations(*set)
                    .await
                    .map_err(|source| DbSetupError::Migrate {
                        name: name.clone(),
                        source,
                    })?;
            }
        }
    }

    let pool_for = |name: &str| pools[name].clone();

    Ok(Repositories {
        exams: Arc::new(PgExamRepository::new(pool_for(&config.entities.exams))),
        users: Arc::new(PgUserRepository::new(pool_for(&config.entities.users))),
        courses: Arc::new(PgCourseRepository::new(pool_for(&config.entities.courses))),
        notes: Arc::new(PgNoteRepository::new(pool_for(&config.entities.notes))),
    })
}
