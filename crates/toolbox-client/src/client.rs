//! HTTP client for the toolbox API.

use crate::error::Error;
use crate::types::*;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Client, Response, StatusCode};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

#[cfg(test)]
mod tests;

/// Header carrying the API key for gated endpoints.
const API_KEY_HEADER: &str = "key";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:9393").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9393".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the API Server Toolbox.
#[derive(Debug, Clone)]
pub struct ToolboxClient {
    client: Client,
    base_url: Url,
}

impl ToolboxClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::CannotBeABase(config.base_url));
        }
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, base_url })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL. Each segment is percent-encoded, so a
    /// filename can never add path components.
    ///
    /// # Errors
    /// Returns error if the base URL cannot carry path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::CannotBeABase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ========================================================================
    // Root
    // ========================================================================

    /// Gets the service banner.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn banner(&self) -> Result<String, Error> {
        let resp = self.client.get(self.endpoint(&[])?).send().await?;
        let message: MessageResponse = self.handle_response(resp).await?;
        Ok(message.message)
    }

    // ========================================================================
    // Notes
    // ========================================================================

    /// Lists all notes.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_notes(&self) -> Result<Vec<Note>, Error> {
        let resp = self.client.get(self.endpoint(&["notes"])?).send().await?;
        self.handle_response(resp).await
    }

    /// Gets a note by id. Returns `None` if it does not exist.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_note(&self, id: i64) -> Result<Option<Note>, Error> {
        let url = self.endpoint(&["notes", &id.to_string()])?;
        let resp = self.client.get(url).send().await?;
        self.handle_optional(resp).await
    }

    /// Creates a note.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the server rejects the fields.
    pub async fn create_note(&self, request: &NoteRequest) -> Result<Note, Error> {
        let url = self.endpoint(&["notes"])?;
        let resp = self.client.post(url).json(request).send().await?;
        self.handle_response(resp).await
    }

    /// Updates a note. Returns `None` if it does not exist.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the merged fields are invalid.
    pub async fn update_note(&self, id: i64, request: &NoteRequest) -> Result<Option<Note>, Error> {
        let url = self.endpoint(&["notes", &id.to_string()])?;
        let resp = self.client.put(url).json(request).send().await?;
        self.handle_optional(resp).await
    }

    /// Deletes a note. Deleting a missing note succeeds.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete_note(&self, id: i64) -> Result<(), Error> {
        let url = self.endpoint(&["notes", &id.to_string()])?;
        let resp = self.client.delete(url).send().await?;
        self.handle_empty_response(resp).await
    }

    // ========================================================================
    // Users & Courses
    // ========================================================================

    /// Lists all users, sending `key` as the API key when given.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] if the key is missing or unknown.
    pub async fn list_users(&self, key: Option<&str>) -> Result<Vec<Record>, Error> {
        let mut request = self.client.get(self.endpoint(&["users"])?);
        if let Some(key) = key {
            request = request.header(API_KEY_HEADER, key);
        }
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    /// Lists all courses.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_courses(&self) -> Result<Vec<Record>, Error> {
        let resp = self.client.get(self.endpoint(&["courses"])?).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Exams
    // ========================================================================

    /// Lists all exams.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_exams(&self) -> Result<Vec<Record>, Error> {
        let resp = self.client.get(self.endpoint(&["exams"])?).send().await?;
        self.handle_response(resp).await
    }

    /// Gets an exam by id. Returns `None` if it does not exist.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_exam(&self, id: i64) -> Result<Option<Record>, Error> {
        let url = self.endpoint(&["exams", &id.to_string()])?;
        let resp = self.client.get(url).send().await?;
        self.handle_optional(resp).await
    }

    /// Lists `limit` exams after skipping `offset`.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn paginate_exams(&self, limit: u64, offset: u64) -> Result<Vec<Record>, Error> {
        let url = self.endpoint(&[
            "exams",
            "paginate",
            &limit.to_string(),
            &offset.to_string(),
        ])?;
        let resp = self.client.get(url).send().await?;
        self.handle_response(resp).await
    }

    /// Summary of the twenty most recently updated exams.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn last_twenty_exams(&self) -> Result<Vec<Record>, Error> {
        let url = self.endpoint(&["exams", "last_twenty"])?;
        let resp = self.client.get(url).send().await?;
        self.handle_response(resp).await
    }

    /// Same as [`ToolboxClient::last_twenty_exams`], through the literal SQL
    /// endpoint.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn last_twenty_exams_by_sql(&self) -> Result<Vec<Record>, Error> {
        let url = self.endpoint(&["exams", "last_twenty_by_sql"])?;
        let resp = self.client.get(url).send().await?;
        self.handle_response(resp).await
    }

    /// Gets the exam with the highest id. Returns `None` if there are none.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn last_exam(&self) -> Result<Option<Record>, Error> {
        let url = self.endpoint(&["exams", "last"])?;
        let resp = self.client.get(url).send().await?;
        self.handle_optional(resp).await
    }

    /// Counts exams.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn count_exams(&self) -> Result<i64, Error> {
        let resp = self.client.get(self.endpoint(&["exams-count"])?).send().await?;
        let count: CountResponse = self.handle_response(resp).await?;
        Ok(count.message)
    }

    // ========================================================================
    // Login
    // ========================================================================

    /// Checks credentials.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, Error> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let url = self.endpoint(&["login"])?;
        let resp = self.client.post(url).json(&request).send().await?;
        let message: MessageResponse = self.handle_response(resp).await?;
        Ok(LoginOutcome::from_message(&message.message))
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Uploads `contents` as `filename`, replacing any existing file.
    ///
    /// # Errors
    /// Returns error if the filename is rejected or the request fails.
    pub async fn upload(&self, filename: &str, contents: Vec<u8>) -> Result<(), Error> {
        let url = self.endpoint(&["upload", filename])?;
        let resp = self.client.put(url).body(contents).send().await?;
        self.handle_empty_response(resp).await
    }

    /// Downloads `filename`.
    ///
    /// # Errors
    /// Returns [`Error::FileNotFound`] if the server has no such file.
    pub async fn download(&self, filename: &str) -> Result<Vec<u8>, Error> {
        let url = self.endpoint(&["download", filename])?;
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(self.error_for(resp).await);
        }

        // A missing file is reported as a 200 JSON message without a
        // disposition header.
        if resp.headers().contains_key(CONTENT_DISPOSITION) {
            Ok(resp.bytes().await?.to_vec())
        } else {
            Err(Error::FileNotFound(filename.to_string()))
        }
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, Error> {
        self.handle_optional(resp).await?.ok_or_else(|| Error::Api {
            status: StatusCode::NO_CONTENT.as_u16(),
            message: "unexpected empty response".to_string(),
        })
    }

    async fn handle_optional<T: serde::de::DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();

        if status == StatusCode::NO_CONTENT {
            Ok(None)
        } else if status.is_success() {
            let bytes = resp.bytes().await?;
            Ok(Some(serde_json::from_slice(&bytes)?))
        } else {
            Err(self.error_for(resp).await)
        }
    }

    async fn handle_empty_response(&self, resp: Response) -> Result<(), Error> {
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(self.error_for(resp).await)
        }
    }

    async fn error_for(&self, resp: Response) -> Error {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => Error::Unauthorized(message_of(&text)),
            StatusCode::NOT_FOUND => Error::NotFound(message_of(&text)),
            StatusCode::UNPROCESSABLE_ENTITY => {
                match serde_json::from_str::<BTreeMap<String, Vec<String>>>(&text) {
                    Ok(fields) => Error::Validation(fields),
                    Err(_) => Error::Api {
                        status: status.as_u16(),
                        message: text,
                    },
                }
            }
            _ => Error::Api {
                status: status.as_u16(),
                message: message_of(&text),
            },
        }
    }
}

/// Extracts the `message` field of an error body, falling back to the raw
/// text.
fn message_of(text: &str) -> String {
    serde_json::from_str::<MessageResponse>(text)
        .map(|m| m.message)
        .unwrap_or_else(|_| text.to_string())
}
