//! SQLite memory repository implementation.
//!
//! Implements `MemoryRepository` from `prism-core`. Memories are append-only;
//! content is stored as compact JSON text so substring search runs over the
//! same serialization the caller sees.

use chrono::Utc;
use prism_core::repository::memory::MemoryRepository;
use prism_types::error::RepositoryError;
use prism_types::memory::{MemoryQuery, MemoryRecord, NewMemory};
use prism_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{db_err, format_datetime, parse_datetime, parse_json, parse_user_id, to_json};

/// SQLite-backed implementation of `MemoryRepository`.
pub struct SqliteMemoryRepository {
    pool: DatabasePool,
}

impl SqliteMemoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MemoryRow {
    id: i64,
    user_id: String,
    memory_type: String,
    content: String,
    timestamp: String,
    emotion: Option<String>,
    topic: Option<String>,
    importance: i64,
}

impl MemoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            memory_type: row.try_get("memory_type")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
            emotion: row.try_get("emotion")?,
            topic: row.try_get("topic")?,
            importance: row.try_get("importance")?,
        })
    }

    fn into_record(self) -> Result<MemoryRecord, RepositoryError> {
        Ok(MemoryRecord {
            id: self.id,
            user_id: parse_user_id(self.user_id)?,
            memory_type: self.memory_type,
            content: parse_json(&self.content)?,
            timestamp: parse_datetime(&self.timestamp)?,
            emotion: self.emotion,
            topic: self.topic,
            importance: self.importance,
        })
    }
}

fn into_records(rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<MemoryRecord>, RepositoryError> {
    rows.iter()
        .map(|row| {
            MemoryRow::from_row(row)
                .map_err(db_err)?
                .into_record()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// MemoryRepository implementation
// ---------------------------------------------------------------------------

impl MemoryRepository for SqliteMemoryRepository {
    async fn append(&self, memory: &NewMemory) -> Result<i64, RepositoryError> {
        let content = to_json(&memory.content)?;
        let now = format_datetime(&Utc::now());

        let result = sqlx::query(
            r#"INSERT INTO memories (user_id, memory_type, content, timestamp, emotion, topic, importance)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(memory.user_id.as_str())
        .bind(&memory.memory_type)
        .bind(&content)
        .bind(&now)
        .bind(&memory.emotion)
        .bind(&memory.topic)
        .bind(memory.importance)
        .execute(&self.pool.writer)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn retrieve(
        &self,
        user_id: &UserId,
        query: &MemoryQuery,
    ) -> Result<Vec<MemoryRecord>, RepositoryError> {
        let rows = match query {
            MemoryQuery::ByType(memory_type) => {
                return self.list_by_type(user_id, memory_type, query.limit()).await;
            }
            // instr() is a case-sensitive byte match, unlike LIKE.
            MemoryQuery::Search(needle) => sqlx::query(
                r#"SELECT id, user_id, memory_type, content, timestamp, emotion, topic, importance
                   FROM memories
                   WHERE user_id = ?
                     AND (instr(content, ?) > 0 OR instr(COALESCE(topic, ''), ?) > 0)
                   ORDER BY timestamp DESC, id DESC
                   LIMIT ?"#,
            )
            .bind(user_id.as_str())
            .bind(needle)
            .bind(needle)
            .bind(query.limit())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(db_err)?,
        };

        into_records(rows)
    }

    async fn list_by_type(
        &self,
        user_id: &UserId,
        memory_type: &str,
        limit: i64,
    ) -> Result<Vec<MemoryRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, user_id, memory_type, content, timestamp, emotion, topic, importance
               FROM memories
               WHERE user_id = ? AND memory_type = ?
               ORDER BY timestamp DESC, id DESC
               LIMIT ?"#,
        )
        .bind(user_id.as_str())
        .bind(memory_type)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(db_err)?;

        into_records(rows)
    }
}
