//! Request and response types for the toolbox API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};


/// A schema-less row from the exams, users or courses tables.
pub type Record = Map<String, Value>;

// ============================================================================
// Notes
// ============================================================================

/// A stored note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Note id.
    pub id: i64,
    /// Title, at least 3 characters.
    pub title: String,
    /// Body.
    pub body: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Body of note create and update requests.
///
/// Omitted fields keep their stored value on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRequest {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl NoteRequest {
    /// Request setting both fields.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Request changing only the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: None,
        }
    }

    /// Request changing only the body.
    #[must_use]
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }
}

// ============================================================================
// Login & Messages
// ============================================================================

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// `{"message": ...}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

/// Exam count response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of exams.
    pub message: i64,
}

/// Outcome of a login attempt. The server answers 200 either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted.
    Passed,
    /// Credentials rejected.
    Failed,
}

impl LoginOutcome {
    /// Message returned by the server for accepted credentials.
    pub const PASSED_MESSAGE: &'static str = "OK: login passed";

    /// Maps a login response message to an outcome.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        if message == Self::PASSED_MESSAGE {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    /// Returns true if the credentials were accepted.
    #[must_use]
    pub fn is_passed(self) -> bool {
        self == Self::Passed
    }
}
