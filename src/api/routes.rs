//! Route configuration.
//!
//! Static segments always win over captures (`/exams/last` is never treated
//! as `/exams/{id}`), so registration order does not matter.

use crate::api::{handlers, middleware::require_api_key};
use crate::error::panic_response;
use crate::state::AppState;
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;


/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Only the user listing is gated by the API key.
    let gated = Router::new()
        .route("/users", get(handlers::list_users))
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        // Banner
        .route("/", get(handlers::root))
        // Notes
        .route(
            "/notes",
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route(
            "/notes/{id}",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        // Courses
        .route("/courses", get(handlers::list_courses))
        // Exams
        .route("/exams", get(handlers::list_exams))
        .route("/exams/{id}", get(handlers::get_exam))
        .route(
            "/exams/paginate/{limit}/{offset}",
            get(handlers::paginate_exams),
        )
        .route("/exams/last_twenty", get(handlers::last_twenty_exams))
        .route(
            "/exams/last_twenty_by_sql",
            get(handlers::last_twenty_exams_by_sql),
        )
        .route("/exams/last", get(handlers::last_exam))
        .route("/exams-count", get(handlers::count_exams))
        // Login
        .route("/login", post(handlers::login))
        // Files
        .route("/upload/{filename}", put(handlers::upload_file))
        .route("/download/{filename}", get(handlers::download_file))
        .merge(gated)
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .with_state(state)
}

/// Creates the router with the CORS, tracing and panic layers used in
/// production.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
