//! Application state management.

use crate::api::ResponseFormatter;
use crate::auth::{ApiKeyAllowList, AuthError};
use crate::config::{Config, Environment, StorageBackend};
use crate::db::{self, DbSetupError};
use crate::files::PublicDir;
use crate::memory::{FixtureError, Fixtures};
use crate::repository::Repositories;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while assembling the application state.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The API key file could not be loaded.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// A database connection could not be opened.
    #[error(transparent)]
    Database(#[from] DbSetupError),
    /// The memory backend fixtures could not be loaded.
    #[error(transparent)]
    Fixtures(#[from] FixtureError),
    /// The public directory could not be created.
    #[error("failed to prepare public directory: {0}")]
    PublicDir(#[from] std::io::Error),
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// One repository per entity.
    pub repos: Repositories,
    /// Keys allowed to call gated endpoints. Read-only after startup.
    pub api_keys: Arc<ApiKeyAllowList>,
    /// Serializes handler results.
    pub formatter: ResponseFormatter,
    /// Upload/download directory.
    pub public_dir: PublicDir,
    /// Runtime environment.
    pub environment: Environment,
}

impl AppState {
    /// Creates a new application state from its parts.
    #[must_use]
    pub fn new(
        repos: Repositories,
        api_keys: ApiKeyAllowList,
        environment: Environment,
        public_dir: PublicDir,
    ) -> Self {
        Self {
            repos,
            api_keys: Arc::new(api_keys),
            formatter: ResponseFormatter::for_environment(environment),
            public_dir,
            environment,
        }
    }

    /// Creates an in-memory application state, used by tests and demos.
    #[must_use]
    pub fn in_memory(
        fixtures: Fixtures,
        api_keys: ApiKeyAllowList,
        environment: Environment,
        public_dir: PublicDir,
    ) -> Self {
        Self::new(fixtures.into_repositories(), api_keys, environment, public_dir)
    }

    /// Creates the application state from configuration: loads the key
    /// file, prepares the public directory and opens the storage backend.
    ///
    /// # Errors
    /// Returns error if any startup resource is unavailable.
    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        let api_keys = ApiKeyAllowList::load(&config.auth.keys_file)?;
        info!(
            keys = api_keys.len(),
            file = %config.auth.keys_file.display(),
            "Loaded API key allow-list"
        );

        let public_dir = PublicDir::new(&config.files.public_dir);
        public_dir.ensure().await?;
        info!(dir = %public_dir.root().display(), "Serving public directory");

        let repos = match config.storage.backend {
            StorageBackend::Postgres => {
                for (entity, connection) in config.entities.iter() {
                    info!(entity, connection, "Entity storage");
                }
                db::connect(config).await?
            }
            StorageBackend::Memory => {
                let fixtures = match &config.storage.fixtures {
                    Some(path) => Fixtures::load(path)?,
                    None => Fixtures::default(),
                };
                info!(
                    exams = fixtures.exams.len(),
                    users = fixtures.users.len(),
                    courses = fixtures.courses.len(),
                    notes = fixtures.notes.len(),
                    "Using in-memory storage"
                );
                fixtures.into_repositories()
            }
        };

        Ok(Self::new(repos, api_keys, config.environment, public_dir))
    }
}
