//! Error types for the REST API.

use crate::models::{MessageResponse, ValidationErrors};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::any::Any;

#[cfg(test)]
mod tests;

/// Body returned for requests without a valid API key.
pub const UNAUTHORIZED_MESSAGE: &str = "sorry, you are not authorized.";

/// Body returned for unmatched routes.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "This is nowhere to be found.";

/// Body returned when a requested download does not exist.
pub const FILE_NOT_FOUND_MESSAGE: &str = "ERROR: file not found";

/// Body returned for filenames outside the accepted set.
pub const INVALID_FILENAME_MESSAGE: &str = "ERROR: invalid filename";

const NASTY_ERROR_PREFIX: &str = "Sorry there was a nasty error - ";

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or unknown API key.
    #[error("Unauthorized")]
    Unauthorized,

    /// No route matched the request.
    #[error("Route not found")]
    RouteNotFound,

    /// Record failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Filename outside the accepted character set. Holds the rejected name.
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    /// Requested download does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(String),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable category reported in generic error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::RouteNotFound => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::InvalidFilename(_) => "INVALID_FILENAME",
            ApiError::FileNotFound(_) => "FILE_NOT_FOUND",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Io(_) => "IO_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidRequest(_) | ApiError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
            ApiError::FileNotFound(_) => StatusCode::OK,
            ApiError::Database(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Builds the generic error body for a category code.
#[must_use]
pub fn nasty_error_message(code: &str) -> String {
    format!("{}{}", NASTY_ERROR_PREFIX, code)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => (status, Json(errors)).into_response(),
            ApiError::Unauthorized => {
                (status, Json(MessageResponse::new(UNAUTHORIZED_MESSAGE))).into_response()
            }
            ApiError::RouteNotFound => {
                (status, Json(MessageResponse::new(ROUTE_NOT_FOUND_MESSAGE))).into_response()
            }
            ApiError::FileNotFound(_) => {
                (status, Json(MessageResponse::new(FILE_NOT_FOUND_MESSAGE))).into_response()
            }
            ApiError::InvalidRequest(ref msg) => {
                let message = format!("ERROR: {}", msg);
                (status, Json(MessageResponse::new(message))).into_response()
            }
            ApiError::InvalidFilename(ref name) => {
                tracing::warn!(filename = %name, "Rejected filename");
                (status, Json(MessageResponse::new(INVALID_FILENAME_MESSAGE))).into_response()
            }
            ApiError::Database(ref msg) | ApiError::Io(ref msg) | ApiError::Internal(ref msg) => {
                tracing::error!(code = self.code(), "{}", msg);
                let body = MessageResponse::new(nasty_error_message(self.code()));
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Renders a handler panic as a generic error response.
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(code = "PANIC", "handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::new(nasty_error_message("PANIC"))),
    )
        .into_response()
}
