//! JSON response formatting shared by every handler.

use crate::config::Environment;
use crate::error::ApiError;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Serializes handler results.
///
/// Absent values become `204 No Content`. Present values are JSON encoded,
/// pretty-printed with a trailing newline in development and compact
/// otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseFormatter {
    pretty: bool,
}

impl ResponseFormatter {
    /// Creates a formatter.
    #[must_use]
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Pretty output in development, compact elsewhere.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.is_development())
    }

    /// Whether output is pretty-printed.
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Encodes a value to the response body bytes.
    ///
    /// # Errors
    /// Returns an error if the value cannot be serialized.
    pub fn encode<T: Serialize + ?Sized>(&self, data: &T) -> Result<Vec<u8>, serde_json::Error> {
        if self.pretty {
            let mut body = serde_json::to_vec_pretty(data)?;
            body.push(b'\n');
            Ok(body)
        } else {
            serde_json::to_vec(data)
        }
    }

    /// Renders an optional value: `None` yields 204 with an empty body.
    pub fn render<T: Serialize>(&self, data: Option<&T>) -> Response {
        match data {
            Some(data) => self.json(data),
            None => Self::no_content(),
        }
    }

    /// Renders a value with status 200.
    pub fn json<T: Serialize + ?Sized>(&self, data: &T) -> Response {
        self.json_with_status(StatusCode::OK, data)
    }

    /// Renders a value with an explicit status.
    pub fn json_with_status<T: Serialize + ?Sized>(&self, status: StatusCode, data: &T) -> Response {
        match self.encode(data) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(err) => ApiError::Internal(format!("failed to encode response: {}", err))
                .into_response(),
        }
    }

    /// Empty `204 No Content` response.
    #[must_use]
    pub fn no_content() -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageResponse;
    use axum::body::to_bytes;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_compact_output() {
        let formatter = ResponseFormatter::new(false);
        let response = formatter.json(&MessageResponse::new("hi"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_string(response).await, r#"{"message":"hi"}"#);
    }

    #[tokio::test]
    async fn test_pretty_output_has_trailing_newline() {
        let formatter = ResponseFormatter::for_environment(Environment::Development);
        assert!(formatter.is_pretty());

        let body = body_string(formatter.json(&MessageResponse::new("hi"))).await;
        assert_eq!(body, "{\n  \"message\": \"hi\"\n}\n");
    }

    #[tokio::test]
    async fn test_absent_value_is_no_content() {
        let formatter = ResponseFormatter::new(true);
        let response = formatter.render::<MessageResponse>(None);

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_absent() {
        let formatter = ResponseFormatter::new(false);
        let rows: Vec<MessageResponse> = Vec::new();
        let response = formatter.render(Some(&rows));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn test_explicit_status() {
        let formatter = ResponseFormatter::for_environment(Environment::Production);
        let response =
            formatter.json_with_status(StatusCode::CREATED, &MessageResponse::new("x"));
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
