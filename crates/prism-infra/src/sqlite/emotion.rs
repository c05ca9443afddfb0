//! SQLite emotional context repository implementation.

use chrono::Utc;
use prism_core::repository::emotion::EmotionRepository;
use prism_types::emotion::{EmotionalContext, NewEmotionalContext};
use prism_types::error::RepositoryError;
use prism_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{db_err, format_datetime, parse_datetime, parse_user_id};

/// SQLite-backed implementation of `EmotionRepository`.
pub struct SqliteEmotionRepository {
    pool: DatabasePool,
}

impl SqliteEmotionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct EmotionRow {
    id: i64,
    user_id: String,
    emotion: String,
    topic: String,
    response_strategy: String,
    timestamp: String,
    effectiveness_score: Option<i64>,
}

impl EmotionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            emotion: row.try_get("emotion")?,
            topic: row.try_get("topic")?,
            response_strategy: row.try_get("response_strategy")?,
            timestamp: row.try_get("timestamp")?,
            effectiveness_score: row.try_get("effectiveness_score")?,
        })
    }

    fn into_context(self) -> Result<EmotionalContext, RepositoryError> {
        Ok(EmotionalContext {
            id: self.id,
            user_id: parse_user_id(self.user_id)?,
            emotion: self.emotion,
            topic: self.topic,
            response_strategy: self.response_strategy,
            timestamp: parse_datetime(&self.timestamp)?,
            effectiveness_score: self.effectiveness_score,
        })
    }
}

impl EmotionRepository for SqliteEmotionRepository {
    async fn record(&self, entry: &NewEmotionalContext) -> Result<i64, RepositoryError> {
        let now = format_datetime(&Utc::now());

        let result = sqlx::query(
            r#"INSERT INTO emotional_context (user_id, emotion, topic, response_strategy, timestamp)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(entry.user_id.as_str())
        .bind(&entry.emotion)
        .bind(&entry.topic)
        .bind(&entry.response_strategy)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn history(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<EmotionalContext>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, user_id, emotion, topic, response_strategy, timestamp, effectiveness_score
               FROM emotional_context
               WHERE user_id = ?
               ORDER BY timestamp DESC, id DESC
               LIMIT ?"#,
        )
        .bind(user_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                EmotionRow::from_row(row)
                    .map_err(db_err)?
                    .into_context()
            })
            .collect()
    }
}
