//! Request and response models for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;


/// Minimum title length accepted for a note.
pub const NOTE_TITLE_MIN_LEN: usize = 3;

const BLANK: &str = "can't be blank";

/// A table row without a fixed schema, serialized column by column.
///
/// Exams, users and courses live in pre-existing tables whose columns are
/// not owned by this service, so rows are passed through as JSON objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Returns the value stored in `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Returns the integer primary key, if present.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(Value::as_i64)
    }

    /// Returns the `updated_at` timestamp, if present and parseable.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.get("updated_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Returns a copy holding only the listed columns. Columns missing from
    /// the row are present as `null`; keys serialize in sorted order.
    #[must_use]
    pub fn project(&self, columns: &[&str]) -> Self {
        let mut map = Map::new();
        for column in columns {
            map.insert(
                (*column).to_string(),
                self.get(column).cloned().unwrap_or(Value::Null),
            );
        }
        Self(map)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Columns returned by the "last twenty exams" queries.
pub const EXAM_SUMMARY_COLUMNS: [&str; 4] = ["id", "cognomenome", "matricola", "updated_at"];

/// A note stored in the notes database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Note {
    /// Primary key.
    pub id: i64,
    /// Note title, at least three characters.
    pub title: String,
    /// Note body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a note.
///
/// Both fields are optional at the parsing stage so that missing values are
/// reported as validation errors rather than parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteRequest {
    /// Note title.
    pub title: Option<String>,
    /// Note body.
    pub body: Option<String>,
}

impl NoteRequest {
    /// Validates the request and returns the fields to persist.
    ///
    /// # Errors
    /// Returns the per-field messages when a field is blank or too short.
    pub fn validate(self) -> Result<NoteFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let title = self.title.unwrap_or_default();
        let body = self.body.unwrap_or_default();

        if title.trim().is_empty() {
            errors.add("title", BLANK);
        }
        if title.chars().count() < NOTE_TITLE_MIN_LEN {
            errors.add(
                "title",
                format!(
                    "is too short (minimum is {} characters)",
                    NOTE_TITLE_MIN_LEN
                ),
            );
        }
        if body.trim().is_empty() {
            errors.add("body", BLANK);
        }

        if errors.is_empty() {
            Ok(NoteFields { title, body })
        } else {
            Err(errors)
        }
    }

    /// Merges this partial update over an existing note.
    #[must_use]
    pub fn merged_with(self, note: &Note) -> Self {
        Self {
            title: Some(self.title.unwrap_or_else(|| note.title.clone())),
            body: Some(self.body.unwrap_or_else(|| note.body.clone())),
        }
    }
}

/// Validated note fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFields {
    /// Note title.
    pub title: String,
    /// Note body.
    pub body: String,
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors(pub BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Records a failure reason for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns true when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the messages recorded for `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{} {}", field, m)))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// User name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
}

/// Generic `{"message": ...}` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Row count wrapped as a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    /// Number of rows.
    pub message: i64,
}
