//! Unit tests for error module.

use super::*;
use axum::body::to_bytes;
use serde_json::{Value, json};

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// ApiError Display Tests
// ============================================================================

#[test]
fn test_api_error_invalid_request_display() {
    let error = ApiError::InvalidRequest("malformed JSON".to_string());
    assert_eq!(format!("{}", error), "Invalid request: malformed JSON");
}

#[test]
fn test_api_error_database_display() {
    let error = ApiError::Database("Connection timeout".to_string());
    assert_eq!(format!("{}", error), "Database error: Connection timeout");
}

#[test]
fn test_api_error_validation_display() {
    let mut errors = ValidationErrors::default();
    errors.add("title", "can't be blank");
    let error = ApiError::Validation(errors);
    assert_eq!(format!("{}", error), "Validation failed: title can't be blank");
}

// ============================================================================
// ApiError IntoResponse Tests
// ============================================================================

#[tokio::test]
async fn test_unauthorized_into_response() {
    let response = ApiError::Unauthorized.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({"message": "sorry, you are not authorized."})
    );
}

#[tokio::test]
async fn test_route_not_found_into_response() {
    let response = ApiError::RouteNotFound.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({"message": "This is nowhere to be found."})
    );
}

#[tokio::test]
async fn test_validation_into_response() {
    let mut errors = ValidationErrors::default();
    errors.add("title", "is too short (minimum is 3 characters)");
    let response = ApiError::Validation(errors).into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await,
        json!({"title": ["is too short (minimum is 3 characters)"]})
    );
}

#[tokio::test]
async fn test_file_not_found_keeps_success_status() {
    let response = ApiError::FileNotFound("missing.txt".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "ERROR: file not found"})
    );
}

#[tokio::test]
async fn test_invalid_filename_into_response() {
    let response = ApiError::InvalidFilename("../etc/passwd".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"message": "ERROR: invalid filename"})
    );
}

#[tokio::test]
async fn test_database_error_hides_details() {
    let response =
        ApiError::Database("relation \"exams\" does not exist".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Sorry there was a nasty error - DATABASE_ERROR"})
    );
}

#[tokio::test]
async fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: ApiError = io.into();
    assert_eq!(error.code(), "IO_ERROR");

    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_panic_response_from_str() {
    let response = panic_response(Box::new("boom"));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Sorry there was a nasty error - PANIC"})
    );
}

#[test]
fn test_sqlx_error_conversion() {
    let error: ApiError = sqlx::Error::RowNotFound.into();
    assert!(matches!(error, ApiError::Database(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// ApiError Debug Tests
// ============================================================================

#[test]
fn test_api_error_debug() {
    let error = ApiError::InvalidFilename("a/b".to_string());
    let debug = format!("{:?}", error);
    assert!(debug.contains("InvalidFilename"));
    assert!(debug.contains("a/b"));
}
