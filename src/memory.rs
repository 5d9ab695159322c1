//! Process-local repositories.
//!
//! Used when the server runs without PostgreSQL and by the test suites.
//! Semantics follow the PostgreSQL backend: lists are ordered by id, the
//! "last twenty" queries order by `updated_at` descending.

use crate::models::{EXAM_SUMMARY_COLUMNS, Note, NoteFields, Record};
use crate::repository::{
    CourseRepository, ExamRepository, LAST_TWENTY_LIMIT, NoteRepository, RepoResult,
    Repositories, UserRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Fixture loading errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Failed to read the fixtures file.
    #[error("failed to read fixtures: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the fixtures file.
    #[error("failed to parse fixtures: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Initial table contents for the memory backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    /// Exam rows.
    pub exams: Vec<Record>,
    /// User rows.
    pub users: Vec<Record>,
    /// Course rows.
    pub courses: Vec<Record>,
    /// Notes.
    pub notes: Vec<Note>,
}

impl Fixtures {
    /// Loads fixtures from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Builds memory repositories holding these rows.
    #[must_use]
    pub fn into_repositories(self) -> Repositories {
        Repositories {
            exams: Arc::new(MemoryExamRepository::new(self.exams)),
            users: Arc::new(MemoryRecordTable::new(self.users)),
            courses: Arc::new(MemoryRecordTable::new(self.courses)),
            notes: Arc::new(MemoryNoteRepository::new(self.notes)),
        }
    }
}

/// A schema-less table kept sorted by id.
#[derive(Debug, Default)]
pub struct MemoryRecordTable {
    rows: RwLock<Vec<Record>>,
}

impl MemoryRecordTable {
    /// Creates a table from rows in any order.
    #[must_use]
    pub fn new(mut rows: Vec<Record>) -> Self {
        rows.sort_by_key(Record::id);
        Self {
            rows: RwLock::new(rows),
        }
    }

    fn all(&self) -> Vec<Record> {
        self.rows.read().clone()
    }
}

#[async_trait]
impl UserRepository for MemoryRecordTable {
    async fn list(&self) -> RepoResult<Vec<Record>> {
        Ok(self.all())
    }
}

#[async_trait]
impl CourseRepository for MemoryRecordTable {
    async fn list(&self) -> RepoResult<Vec<Record>> {
        Ok(self.all())
    }
}

/// Exams held in memory.
#[derive(Debug, Default)]
pub struct MemoryExamRepository {
    table: MemoryRecordTable,
}

impl MemoryExamRepository {
    /// Creates the repository from rows in any order.
    #[must_use]
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            table: MemoryRecordTable::new(rows),
        }
    }

    fn latest_summaries(&self) -> Vec<Record> {
        let mut rows = self.table.all();
        // Stable sort keeps id order among equal timestamps; rows without a
        // timestamp go last.
        rows.sort_by_key(|row| Reverse(row.updated_at()));
        rows.iter()
            .take(LAST_TWENTY_LIMIT as usize)
            .map(|row| row.project(&EXAM_SUMMARY_COLUMNS))
            .collect()
    }
}

#[async_trait]
impl ExamRepository for MemoryExamRepository {
    async fn list(&self) -> RepoResult<Vec<Record>> {
        Ok(self.table.all())
    }

    async fn paginate(&self, limit: i64, offset: i64) -> RepoResult<Vec<Record>> {
        let rows = self.table.rows.read();
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(rows.iter().skip(offset).take(limit).cloned().collect())
    }

    async fn last_twenty(&self) -> RepoResult<Vec<Record>> {
        Ok(self.latest_summaries())
    }

    async fn last_twenty_by_sql(&self) -> RepoResult<Vec<Record>> {
        Ok(self.latest_summaries())
    }

    async fn last(&self) -> RepoResult<Option<Record>> {
        Ok(self.table.rows.read().last().cloned())
    }

    async fn count(&self) -> RepoResult<i64> {
        Ok(self.table.rows.read().len() as i64)
    }

    async fn find(&self, id: i64) -> RepoResult<Option<Record>> {
        Ok(self
            .table
            .rows
            .read()
            .iter()
            .find(|row| row.id() == Some(id))
            .cloned())
    }
}

#[derive(Debug, Default)]
struct NoteTable {
    next_id: i64,
    notes: BTreeMap<i64, Note>,
}

/// Notes held in memory.
#[derive(Debug, Default)]
pub struct MemoryNoteRepository {
    inner: RwLock<NoteTable>,
}

impl MemoryNoteRepository {
    /// Creates the repository from existing notes.
    #[must_use]
    pub fn new(notes: Vec<Note>) -> Self {
        let notes: BTreeMap<i64, Note> = notes.into_iter().map(|n| (n.id, n)).collect();
        let next_id = notes.keys().next_back().map_or(1, |id| id + 1);
        Self {
            inner: RwLock::new(NoteTable { next_id, notes }),
        }
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn list(&self) -> RepoResult<Vec<Note>> {
        Ok(self.inner.read().notes.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> RepoResult<Option<Note>> {
        Ok(self.inner.read().notes.get(&id).cloned())
    }

    async fn create(&self, fields: NoteFields) -> RepoResult<Note> {
        let mut table = self.inner.write();
        let id = table.next_id.max(1);
        table.next_id = id + 1;

        let now = Utc::now();
        let note = Note {
            id,
            title: fields.title,
            body: fields.body,
            created_at: now,
            updated_at: now,
        };
        table.notes.insert(id, note.clone());
        Ok(note)
    }

    async fn update(&self, id: i64, fields: NoteFields) -> RepoResult<Option<Note>> {
        let mut table = self.inner.write();
        Ok(table.notes.get_mut(&id).map(|note| {
            note.title = fields.title;
            note.body = fields.body;
            note.updated_at = Utc::now();
            note.clone()
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.inner.write().notes.remove(&id).is_some())
    }
}
