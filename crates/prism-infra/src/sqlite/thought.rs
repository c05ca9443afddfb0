//! SQLite thought log implementation. The log is global, not per user.

use chrono::Utc;
use prism_core::repository::thought::ThoughtRepository;
use prism_types::error::RepositoryError;
use prism_types::thought::{NewThought, Thought};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{db_err, format_datetime, parse_datetime, parse_json, to_json};

/// SQLite-backed implementation of `ThoughtRepository`.
pub struct SqliteThoughtRepository {
    pool: DatabasePool,
}

impl SqliteThoughtRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ThoughtRow {
    id: i64,
    thought_type: String,
    content: String,
    context: String,
    outcome: String,
    timestamp: String,
}

impl ThoughtRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            thought_type: row.try_get("thought_type")?,
            content: row.try_get("content")?,
            context: row.try_get("context")?,
            outcome: row.try_get("outcome")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_thought(self) -> Result<Thought, RepositoryError> {
        Ok(Thought {
            id: self.id,
            thought_type: self.thought_type,
            content: self.content,
            context: parse_json(&self.context)?,
            outcome: self.outcome,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

impl ThoughtRepository for SqliteThoughtRepository {
    async fn log(&self, thought: &NewThought) -> Result<i64, RepositoryError> {
        let context = to_json(&thought.context)?;
        let now = format_datetime(&Utc::now());

        let result = sqlx::query(
            r#"INSERT INTO thoughts (thought_type, content, context, outcome, timestamp)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&thought.thought_type)
        .bind(&thought.content)
        .bind(&context)
        .bind(&thought.outcome)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Thought>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, thought_type, content, context, outcome, timestamp
               FROM thoughts
               ORDER BY timestamp DESC, id DESC
               LIMIT ?"#,
        )
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                ThoughtRow::from_row(row)
                    .map_err(db_err)?
                    .into_thought()
            })
            .collect()
    }
}
