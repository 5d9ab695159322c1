//! PostgreSQL repositories for the exams, users and courses tables.
//!
//! Rows are converted to JSON objects by the database (`row_to_json`), so the
//! API returns whatever columns the existing tables carry.

use super::DatabasePool;
use crate::models::{EXAM_SUMMARY_COLUMNS, Record};
use crate::repository::{
    CourseRepository, ExamRepository, LAST_TWENTY_LIMIT, RepoResult, UserRepository,
};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};

/// Hand-written equivalent of the query built in [`PgExamRepository::last_twenty`].
const LAST_TWENTY_SQL: &str = "SELECT row_to_json(e) AS record FROM \
     (SELECT id, cognomenome, matricola, updated_at FROM exams \
     ORDER BY updated_at DESC NULLS LAST, id LIMIT 20) e \
     ORDER BY e.updated_at DESC NULLS LAST, e.id";

/// A table whose rows are returned as JSON objects.
#[derive(Clone)]
struct JsonTable {
    db: DatabasePool,
    table: &'static str,
}

impl JsonTable {
    fn new(db: DatabasePool, table: &'static str) -> Self {
        Self { db, table }
    }

    fn select(&self) -> QueryBuilder<'static, Postgres> {
        QueryBuilder::new(format!(
            "SELECT row_to_json(t) AS record FROM {} t",
            self.table
        ))
    }

    async fn fetch_all(&self, mut query: QueryBuilder<'_, Postgres>) -> RepoResult<Vec<Record>> {
        let rows: Vec<Json<Record>> = query
            .build_query_scalar()
            .fetch_all(self.db.pool())
            .await?;
        Ok(rows.into_iter().map(|Json(record)| record).collect())
    }

    async fn fetch_optional(
        &self,
        mut query: QueryBuilder<'_, Postgres>,
    ) -> RepoResult<Option<Record>> {
        let row: Option<Json<Record>> = query
            .build_query_scalar()
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(|Json(record)| record))
    }

    async fn list(&self) -> RepoResult<Vec<Record>> {
        let mut query = self.select();
        query.push(" ORDER BY t.id");
        self.fetch_all(query).await
    }
}

/// Builds the "last twenty exams" query with the row limit as a bind.
fn last_twenty_query() -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT row_to_json(e) AS record FROM (SELECT ");
    let mut columns = query.separated(", ");
    for column in EXAM_SUMMARY_COLUMNS {
        columns.push(column);
    }
    query.push(" FROM exams ORDER BY updated_at DESC NULLS LAST, id LIMIT ");
    query.push_bind(LAST_TWENTY_LIMIT);
    query.push(") e ORDER BY e.updated_at DESC NULLS LAST, e.id");
    query
}

/// Exams stored in PostgreSQL.
#[derive(Clone)]
pub struct PgExamRepository {
    table: JsonTable,
}

impl PgExamRepository {
    /// Creates the repository on the given connection.
    #[must_use]
    pub fn new(db: DatabasePool) -> Self {
        Self {
            table: JsonTable::new(db, "exams"),
        }
    }
}

#[async_trait]
impl ExamRepository for PgExamRepository {
    async fn list(&self) -> RepoResult<Vec<Record>> {
        self.table.list().await
    }

    async fn paginate(&self, limit: i64, offset: i64) -> RepoResult<Vec<Record>> {
        let mut query = self.table.select();
        query.push(" ORDER BY t.id LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);
        self.table.fetch_all(query).await
    }

    async fn last_twenty(&self) -> RepoResult<Vec<Record>> {
        self.table.fetch_all(last_twenty_query()).await
    }

    async fn last_twenty_by_sql(&self) -> RepoResult<Vec<Record>> {
        let rows: Vec<Json<Record>> = sqlx::query_scalar(LAST_TWENTY_SQL)
            .fetch_all(self.table.db.pool())
            .await?;
        Ok(rows.into_iter().map(|Json(record)| record).collect())
    }

    async fn last(&self) -> RepoResult<Option<Record>> {
        let mut query = self.table.select();
        query.push(" ORDER BY t.id DESC LIMIT 1");
        self.table.fetch_optional(query).await
    }

    async fn count(&self) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams")
            .fetch_one(self.table.db.pool())
            .await?;
        Ok(count)
    }

    async fn find(&self, id: i64) -> RepoResult<Option<Record>> {
        let mut query = self.table.select();
        query.push(" WHERE t.id = ");
        query.push_bind(id);
        self.table.fetch_optional(query).await
    }
}

/// Users stored in PostgreSQL.
#[derive(Clone)]
pub struct PgUserRepository {
    table: JsonTable,
}

impl PgUserRepository {
    /// Creates the repository on the given connection.
    #[must_use]
    pub fn new(db: DatabasePool) -> Self {
        Self {
            table: JsonTable::new(db, "users"),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> RepoResult<Vec<Record>> {
        self.table.list().await
    }
}

/// Courses stored in PostgreSQL.
#[derive(Clone)]
pub struct PgCourseRepository {
    table: JsonTable,
}

impl PgCourseRepository {
    /// Creates the repository on the given connection.
    #[must_use]
    pub fn new(db: DatabasePool) -> Self {
        Self {
            table: JsonTable::new(db, "courses"),
        }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn list(&self) -> RepoResult<Vec<Record>> {
        self.table.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_twenty_query_matches_literal_sql() {
        let query = last_twenty_query();
        let literal = LAST_TWENTY_SQL.replace(
            &format!("LIMIT {}", LAST_TWENTY_LIMIT),
            "LIMIT $1",
        );

        assert_ne!(literal, LAST_TWENTY_SQL);
        assert_eq!(query.sql(), literal);
    }

    #[test]
    fn test_last_twenty_query_selects_summary_columns() {
        let query = last_twenty_query();
        let columns = EXAM_SUMMARY_COLUMNS.join(", ");
        assert!(query.sql().contains(&format!("(SELECT {} FROM exams", columns)));
    }
}
