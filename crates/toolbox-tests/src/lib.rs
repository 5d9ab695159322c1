//! End-to-end test harness for the API Server Toolbox.
//!
//! Each [`TestServer`] runs the full application (router, CORS, tracing and
//! panic layers) on an ephemeral port with the in-memory backend and a
//! temporary public directory.

use api_toolbox_backend::api::create_app;
use api_toolbox_backend::auth::ApiKeyAllowList;
use api_toolbox_backend::config::Environment;
use api_toolbox_backend::files::PublicDir;
use api_toolbox_backend::memory::Fixtures;
use api_toolbox_backend::models::Record;
use api_toolbox_backend::state::AppState;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use toolbox_client::{ClientConfig, ToolboxClient};

/// API key accepted by test servers.
pub const TEST_API_KEY: &str = "c39547b2-dfcc-4c24-a867-55f26e1ca772";

/// Number of exams in [`sample_fixtures`].
pub const SAMPLE_EXAM_COUNT: i64 = 30;

/// Id of the most recently updated exam in [`sample_fixtures`].
pub const MOST_RECENT_EXAM_ID: i64 = 3;

/// A running server and a client pointed at it.
pub struct TestServer {
    /// Client for the server.
    pub client: ToolboxClient,
    /// Base URL, e.g. `http://127.0.0.1:40123`.
    pub base_url: String,
    public_dir: TempDir,
}

impl TestServer {
    /// Starts a server over [`sample_fixtures`].
    ///
    /// # Panics
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        Self::start_with(sample_fixtures()).await
    }

    /// Starts a server over the given fixtures.
    ///
    /// # Panics
    /// Panics if the listener cannot be bound.
    pub async fn start_with(fixtures: Fixtures) -> Self {
        let public_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let state = AppState::in_memory(
            fixtures,
            ApiKeyAllowList::from_keys([TEST_API_KEY]),
            Environment::Test,
            PublicDir::new(public_dir.path()),
        );
        let app = create_app(Arc::new(state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = format!("http://{}", addr);
        let client = ToolboxClient::new(ClientConfig {
            base_url: base_url.clone(),
            timeout: Duration::from_secs(10),
        })
        .expect("Failed to create client");

        Self {
            client,
            base_url,
            public_dir,
        }
    }

    /// Directory uploads land in.
    #[must_use]
    pub fn public_dir(&self) -> &std::path::Path {
        self.public_dir.path()
    }
}

/// Exams 1 to 30, users and courses. Exam 3 is the most recently updated.
#[must_use]
pub fn sample_fixtures() -> Fixtures {
    let exams = (1..=SAMPLE_EXAM_COUNT)
        .map(|id| {
            let updated_at = if id == MOST_RECENT_EXAM_ID {
                "2024-12-31T23:59:59Z".to_string()
            } else {
                format!("2024-05-{:02}T09:00:00Z", id)
            };
            record(json!({
                "id": id,
                "cognomenome": format!("Rossi{} Mario{}", id, id),
                "matricola": format!("M{:05}", id),
                "voto": 18 + id % 13,
                "updated_at": updated_at,
            }))
        })
        .collect();

    Fixtures {
        exams,
        users: vec![
            record(json!({"id": 1, "username": "admin", "email": "admin@example.com"})),
            record(json!({"id": 2, "username": "guest", "email": "guest@example.com"})),
        ],
        courses: vec![
            record(json!({"id": 1, "name": "Anatomia"})),
            record(json!({"id": 2, "name": "Fisiologia"})),
        ],
        notes: Vec::new(),
    }
}

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).expect("fixture rows are JSON objects")
}
