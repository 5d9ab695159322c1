//! Error types for the toolbox client.

use std::collections::BTreeMap;
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Client error types.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be a base: {0}")]
    CannotBeABase(String),

    /// The API key was missing or not on the allow-list.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No route matched the request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request body failed validation, keyed by field.
    #[error("Validation failed: {0:?}")]
    Validation(BTreeMap<String, Vec<String>>),

    /// The requested file does not exist on the server.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from API.
        message: String,
    },
}
