//! API request handlers.

use crate::auth::check_login;
use crate::error::ApiError;
use crate::models::{CountResponse, LoginRequest, MessageResponse, Note, NoteRequest, Record};
use crate::state::AppState;
use axum::body::{Body, Bytes};
use axum::extract::{Path, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, info};

/// Handler result: a formatted response or an API error.
pub type HandlerResult = Result<Response, ApiError>;

/// Message returned by a successful login.
pub const LOGIN_OK_MESSAGE: &str = "OK: login passed";

/// Message returned by a failed login.
pub const LOGIN_FAILED_MESSAGE: &str = "ERROR: invalid username or password";

/// Parses a raw request body as JSON regardless of its content type.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidRequest(format!("malformed JSON body: {}", e)))
}

/// Parses a record id path segment. Non-numeric ids match no record.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

/// Parses a pagination path segment as a non-negative row count.
fn parse_window(name: &str, raw: &str) -> Result<i64, ApiError> {
    raw.parse::<u64>()
        .ok()
        .and_then(|value| i64::try_from(value).ok())
        .ok_or_else(|| {
            ApiError::InvalidRequest(format!("{} must be a non-negative integer: {}", name, raw))
        })
}

// ============================================================================
// Root & Fallback
// ============================================================================

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = MessageResponse)
    ),
    tag = "Health"
)]
pub async fn root(State(state): State<Arc<AppState>>) -> Response {
    let banner = format!("API Server Toolbox v{}", env!("CARGO_PKG_VERSION"));
    state.formatter.json(&MessageResponse::new(banner))
}

/// Fallback for unmatched routes and methods.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

// ============================================================================
// Notes
// ============================================================================

/// List all notes.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes", body = Vec<Note>)
    ),
    tag = "Notes"
)]
pub async fn list_notes(State(state): State<Arc<AppState>>) -> HandlerResult {
    let notes = state.repos.notes.list().await?;
    Ok(state.formatter.json(&notes))
}

/// Get a note by id.
#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note id")
    ),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 204, description = "No note with this id")
    ),
    tag = "Notes"
)]
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let note = match parse_id(&id) {
        Some(id) => state.repos.notes.find(id).await?,
        None => None,
    };
    Ok(state.formatter.render(note.as_ref()))
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Created note", body = Note),
        (status = 400, description = "Malformed JSON", body = MessageResponse),
        (status = 422, description = "Validation errors keyed by field", body = crate::models::ValidationErrors)
    ),
    tag = "Notes"
)]
pub async fn create_note(State(state): State<Arc<AppState>>, body: Bytes) -> HandlerResult {
    let request: NoteRequest = parse_body(&body)?;
    let fields = request.validate()?;
    let note = state.repos.notes.create(fields).await?;
    info!(id = note.id, "Created note");
    Ok(state.formatter.json(&note))
}

/// Update a note.
#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note id")
    ),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 204, description = "No note with this id"),
        (status = 400, description = "Malformed JSON", body = MessageResponse),
        (status = 422, description = "Validation errors keyed by field", body = crate::models::ValidationErrors)
    ),
    tag = "Notes"
)]
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> HandlerResult {
    let Some(id) = parse_id(&id) else {
        return Ok(state.formatter.render::<Note>(None));
    };
    let Some(existing) = state.repos.notes.find(id).await? else {
        return Ok(state.formatter.render::<Note>(None));
    };

    let patch: NoteRequest = parse_body(&body)?;
    let fields = patch.merged_with(&existing).validate()?;
    let note = state.repos.notes.update(id, fields).await?;
    if note.is_some() {
        info!(id, "Updated note");
    }
    Ok(state.formatter.render(note.as_ref()))
}

/// Delete a note. Always answers 204.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note id")
    ),
    responses(
        (status = 204, description = "Note deleted or already absent")
    ),
    tag = "Notes"
)]
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult {
    if let Some(id) = parse_id(&id)
        && state.repos.notes.delete(id).await?
    {
        info!(id, "Deleted note");
    }
    Ok(crate::api::ResponseFormatter::no_content())
}

// ============================================================================
// Courses & Users
// ============================================================================

/// List all courses.
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "All courses", body = Vec<Record>)
    ),
    tag = "Courses"
)]
pub async fn list_courses(State(state): State<Arc<AppState>>) -> HandlerResult {
    let courses = state.repos.courses.list().await?;
    Ok(state.formatter.json(&courses))
}

/// List all users. Requires an allowed `key` header.
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("key" = String, Header, description = "API key from the allow-list")
    ),
    responses(
        (status = 200, description = "All users", body = Vec<Record>),
        (status = 401, description = "Missing or unknown key", body = MessageResponse)
    ),
    tag = "Users"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> HandlerResult {
    let users = state.repos.users.list().await?;
    Ok(state.formatter.json(&users))
}

// ============================================================================
// Exams
// ============================================================================

/// List all exams.
#[utoipa::path(
    get,
    path = "/exams",
    responses(
        (status = 200, description = "All exams", body = Vec<Record>)
    ),
    tag = "Exams"
)]
pub async fn list_exams(State(state): State<Arc<AppState>>) -> HandlerResult {
    let exams = state.repos.exams.list().await?;
    Ok(state.formatter.json(&exams))
}

/// List a window of exams.
#[utoipa::path(
    get,
    path = "/exams/paginate/{limit}/{offset}",
    params(
        ("limit" = u64, Path, description = "Rows per page"),
        ("offset" = u64, Path, description = "Rows to skip, (page - 1) * limit")
    ),
    responses(
        (status = 200, description = "Exams in the window", body = Vec<Record>),
        (status = 400, description = "Non-numeric window", body = MessageResponse)
    ),
    tag = "Exams"
)]
pub async fn paginate_exams(
    State(state): State<Arc<AppState>>,
    Path((limit, offset)): Path<(String, String)>,
) -> HandlerResult {
    let limit = parse_window("limit", &limit)?;
    let offset = parse_window("offset", &offset)?;
    debug!(limit, offset, "Paginating exams");
    let exams = state.repos.exams.paginate(limit, offset).await?;
    Ok(state.formatter.json(&exams))
}

/// Summary of the twenty most recently updated exams.
#[utoipa::path(
    get,
    path = "/exams/last_twenty",
    responses(
        (status = 200, description = "id, cognomenome, matricola, updated_at of up to 20 exams", body = Vec<Record>)
    ),
    tag = "Exams"
)]
pub async fn last_twenty_exams(State(state): State<Arc<AppState>>) -> HandlerResult {
    let exams = state.repos.exams.last_twenty().await?;
    Ok(state.formatter.json(&exams))
}

/// Same as `/exams/last_twenty`, through a literal SQL query.
#[utoipa::path(
    get,
    path = "/exams/last_twenty_by_sql",
    responses(
        (status = 200, description = "id, cognomenome, matricola, updated_at of up to 20 exams", body = Vec<Record>)
    ),
    tag = "Exams"
)]
pub async fn last_twenty_exams_by_sql(State(state): State<Arc<AppState>>) -> HandlerResult {
    let exams = state.repos.exams.last_twenty_by_sql().await?;
    Ok(state.formatter.json(&exams))
}

/// The last exam.
#[utoipa::path(
    get,
    path = "/exams/last",
    responses(
        (status = 200, description = "Exam with the highest id", body = Record),
        (status = 204, description = "No exams")
    ),
    tag = "Exams"
)]
pub async fn last_exam(State(state): State<Arc<AppState>>) -> HandlerResult {
    let exam = state.repos.exams.last().await?;
    Ok(state.formatter.render(exam.as_ref()))
}

/// Number of exams.
#[utoipa::path(
    get,
    path = "/exams-count",
    responses(
        (status = 200, description = "Exam count", body = CountResponse)
    ),
    tag = "Exams"
)]
pub async fn count_exams(State(state): State<Arc<AppState>>) -> HandlerResult {
    let count = state.repos.exams.count().await?;
    Ok(state.formatter.json(&CountResponse { message: count }))
}

/// Get an exam by id.
#[utoipa::path(
    get,
    path = "/exams/{id}",
    params(
        ("id" = i64, Path, description = "Exam id")
    ),
    responses(
        (status = 200, description = "The exam", body = Record),
        (status = 204, description = "No exam with this id")
    ),
    tag = "Exams"
)]
pub async fn get_exam(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let exam = match parse_id(&id) {
        Some(id) => state.repos.exams.find(id).await?,
        None => None,
    };
    Ok(state.formatter.render(exam.as_ref()))
}

// ============================================================================
// Login
// ============================================================================

/// Check credentials against the built-in admin account.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login outcome message", body = MessageResponse),
        (status = 400, description = "Malformed JSON", body = MessageResponse)
    ),
    tag = "Auth"
)]
pub async fn login(State(state): State<Arc<AppState>>, body: Bytes) -> HandlerResult {
    let request: LoginRequest = parse_body(&body)?;
    let message = if check_login(request.username.as_deref(), request.password.as_deref()) {
        LOGIN_OK_MESSAGE
    } else {
        LOGIN_FAILED_MESSAGE
    };
    Ok(state.formatter.json(&MessageResponse::new(message)))
}

// ============================================================================
// File Transfer
// ============================================================================

/// Upload a file into the public directory, replacing any existing file.
#[utoipa::path(
    put,
    path = "/upload/{filename}",
    params(
        ("filename" = String, Path, description = "Target filename, [A-Za-z0-9._-]")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "File written"),
        (status = 400, description = "Invalid filename", body = MessageResponse)
    ),
    tag = "Files"
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    body: Body,
) -> HandlerResult {
    let bytes = state.public_dir.write(&filename, body).await?;
    info!(filename = %filename, bytes, "Stored upload");
    Ok(StatusCode::OK.into_response())
}

/// Download a file from the public directory as an attachment.
#[utoipa::path(
    get,
    path = "/download/{filename}",
    params(
        ("filename" = String, Path, description = "Filename, [A-Za-z0-9._-]")
    ),
    responses(
        (status = 200, description = "File contents, or a not-found message"),
        (status = 400, description = "Invalid filename", body = MessageResponse)
    ),
    tag = "Files"
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> HandlerResult {
    let path = state.public_dir.locate(&filename).await?;

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    let mut response = response.map(Body::new);

    // Names are restricted to a header-safe character set.
    let disposition = format!("attachment; filename=\"{}\"", filename);
    let value = HeaderValue::from_str(&disposition)
        .map_err(|e| ApiError::Internal(format!("invalid disposition header: {}", e)))?;
    response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    Ok(response)
}
