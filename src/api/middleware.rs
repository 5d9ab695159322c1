//! API middleware for API key authorization.

use crate::auth::API_KEY_HEADER;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Extracts the API key header value, if present and valid UTF-8.
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
}

/// Authorization middleware.
///
/// Lets the request through only when the `key` header exactly matches an
/// allowed key; otherwise answers 401 without calling the handler.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.api_keys.is_allowed(extract_api_key(&request)) {
        warn!(path = %request.uri().path(), "Rejected request without an allowed API key");
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_api_key_present() {
        let request = Request::builder()
            .uri("/users")
            .header("key", "c39547b2-dfcc-4c24-a867-55f26e1ca772")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            extract_api_key(&request),
            Some("c39547b2-dfcc-4c24-a867-55f26e1ca772")
        );
    }

    #[test]
    fn test_extract_api_key_header_name_is_case_insensitive() {
        let request = Request::builder()
            .uri("/users")
            .header("KEY", "abc")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract_api_key(&request), Some("abc"));
    }

    #[test]
    fn test_extract_api_key_missing() {
        let request = Request::builder().uri("/users").body(Body::empty()).unwrap();
        assert_eq!(extract_api_key(&request), None);
    }

    #[test]
    fn test_api_key_header_constant() {
        assert_eq!(API_KEY_HEADER, "key");
    }
}
