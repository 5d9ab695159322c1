//! Storage traits implemented by the PostgreSQL and in-memory backends.
//!
//! Handlers only see these traits. Each entity gets its own repository so
//! that entities can live behind different database connections.

use crate::error::ApiError;
use crate::models::{Note, NoteFields, Record};
use async_trait::async_trait;
use std::sync::Arc;

/// Result type returned by repository operations.
pub type RepoResult<T> = Result<T, ApiError>;

/// Maximum rows returned by the "last twenty" exam queries.
pub const LAST_TWENTY_LIMIT: i64 = 20;

/// Read access to the `exams` table.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// All exams ordered by id.
    async fn list(&self) -> RepoResult<Vec<Record>>;

    /// A window of exams ordered by id.
    async fn paginate(&self, limit: i64, offset: i64) -> RepoResult<Vec<Record>>;

    /// Summary columns of the most recently updated exams, built through the
    /// query builder.
    async fn last_twenty(&self) -> RepoResult<Vec<Record>>;

    /// Same rows as [`ExamRepository::last_twenty`] from a literal SQL query.
    async fn last_twenty_by_sql(&self) -> RepoResult<Vec<Record>>;

    /// The exam with the highest id.
    async fn last(&self) -> RepoResult<Option<Record>>;

    /// Number of exams.
    async fn count(&self) -> RepoResult<i64>;

    /// The exam with the given id.
    async fn find(&self, id: i64) -> RepoResult<Option<Record>>;
}

/// Read access to the `users` table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by id.
    async fn list(&self) -> RepoResult<Vec<Record>>;
}

/// Read access to the `courses` table.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// All courses ordered by id.
    async fn list(&self) -> RepoResult<Vec<Record>>;
}

/// Full CRUD over the `notes` table.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes ordered by id.
    async fn list(&self) -> RepoResult<Vec<Note>>;

    /// The note with the given id.
    async fn find(&self, id: i64) -> RepoResult<Option<Note>>;

    /// Inserts a note and returns it with generated id and timestamps.
    async fn create(&self, fields: NoteFields) -> RepoResult<Note>;

    /// Overwrites a note's fields, returning `None` if it no longer exists.
    async fn update(&self, id: i64, fields: NoteFields) -> RepoResult<Option<Note>>;

    /// Deletes a note, returning whether a row was removed.
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

/// One repository per entity.
#[derive(Clone)]
pub struct Repositories {
    /// Exams repository.
    pub exams: Arc<dyn ExamRepository>,
    /// Users repository.
    pub users: Arc<dyn UserRepository>,
    /// Courses repository.
    pub courses: Arc<dyn CourseRepository>,
    /// Notes repository.
    pub notes: Arc<dyn NoteRepository>,
}
