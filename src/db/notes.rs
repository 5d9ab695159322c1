//! PostgreSQL repository for notes.

use super::DatabasePool;
use crate::models::{Note, NoteFields};
use crate::repository::{NoteRepository, RepoResult};
use async_trait::async_trait;

/// Column list with casts, so tables created with `integer` ids or
/// `timestamp` columns still decode.
const NOTE_COLUMNS: &str = "id::BIGINT AS id, title, body, \
     created_at::TIMESTAMPTZ AS created_at, updated_at::TIMESTAMPTZ AS updated_at";

/// Notes stored in PostgreSQL.
#[derive(Clone)]
pub struct PgNoteRepository {
    db: DatabasePool,
}

impl PgNoteRepository {
    /// Creates the repository on the given connection.
    #[must_use]
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self) -> RepoResult<Vec<Note>> {
        let sql = format!("SELECT {} FROM notes ORDER BY id", NOTE_COLUMNS);
        let notes = sqlx::query_as::<_, Note>(&sql)
            .fetch_all(self.db.pool())
            .await?;
        Ok(notes)
    }

    async fn find(&self, id: i64) -> RepoResult<Option<Note>> {
        let sql = format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS);
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(note)
    }

    async fn create(&self, fields: NoteFields) -> RepoResult<Note> {
        let sql = format!(
            r#"
            INSERT INTO notes (title, body, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING {}
            "#,
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(&fields.title)
            .bind(&fields.body)
            .fetch_one(self.db.pool())
            .await?;
        Ok(note)
    }

    async fn update(&self, id: i64, fields: NoteFields) -> RepoResult<Option<Note>> {
        let sql = format!(
            r#"
            UPDATE notes
            SET title = $1, body = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING {}
            "#,
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(&fields.title)
            .bind(&fields.body)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(note)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
