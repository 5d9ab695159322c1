//! API Server Toolbox
//!
//! REST API server for notes, exams, users and courses.

use api_toolbox_backend::api::create_app;
use api_toolbox_backend::config::Config;
use api_toolbox_backend::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_toolbox_backend::models::{
    CountResponse, LoginRequest, MessageResponse, Note, NoteRequest, Record, ValidationErrors,
};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        api_toolbox_backend::api::handlers::root,
        api_toolbox_backend::api::handlers::list_notes,
        api_toolbox_backend::api::handlers::get_note,
        api_toolbox_backend::api::handlers::create_note,
        api_toolbox_backend::api::handlers::update_note,
        api_toolbox_backend::api::handlers::delete_note,
        api_toolbox_backend::api::handlers::list_courses,
        api_toolbox_backend::api::handlers::list_users,
        api_toolbox_backend::api::handlers::list_exams,
        api_toolbox_backend::api::handlers::paginate_exams,
        api_toolbox_backend::api::handlers::last_twenty_exams,
        api_toolbox_backend::api::handlers::last_twenty_exams_by_sql,
        api_toolbox_backend::api::handlers::last_exam,
        api_toolbox_backend::api::handlers::count_exams,
        api_toolbox_backend::api::handlers::get_exam,
        api_toolbox_backend::api::handlers::login,
        api_toolbox_backend::api::handlers::upload_file,
        api_toolbox_backend::api::handlers::download_file,
    ),
    components(
        schemas(
            Note,
            NoteRequest,
            Record,
            ValidationErrors,
            LoginRequest,
            MessageResponse,
            CountResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service banner"),
        (name = "Notes", description = "Note management"),
        (name = "Exams", description = "Exam queries"),
        (name = "Users", description = "User listing, API key required"),
        (name = "Courses", description = "Course listing"),
        (name = "Auth", description = "Login check"),
        (name = "Files", description = "Public directory upload and download"),
    ),
    info(
        title = "API Server Toolbox",
        version = "0.2.0",
        description = "REST API for notes, exams, users and courses",
        license(name = "MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let default_filter = if config.environment.is_development() {
        "info,tower_http=debug,sqlx=info"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        environment = %config.environment,
        storage = ?config.storage.backend,
        "Loaded configuration"
    );

    // Create application state
    let state = Arc::new(AppState::from_config(&config).await?);

    let host = &config.server.host;
    let port = config.server.port;

    info!("Starting API Server Toolbox on {}:{}", host, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        host, port
    );

    // Build the router
    let app = create_app(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
