//! SQLite goal repository implementation.
//!
//! Progress updates run inside one writer transaction so the read of the
//! current row and the write of the new values cannot interleave with
//! another update.

use chrono::{NaiveDate, Utc};
use prism_core::repository::goal::GoalRepository;
use prism_types::error::RepositoryError;
use prism_types::goal::{Goal, GoalProgressUpdate, GoalStatus, NewGoal};
use prism_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{db_err, format_datetime, parse_datetime, parse_user_id};

const TARGET_DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed implementation of `GoalRepository`.
pub struct SqliteGoalRepository {
    pool: DatabasePool,
}

impl SqliteGoalRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct GoalRow {
    id: i64,
    user_id: String,
    goal_type: String,
    title: String,
    description: String,
    target_date: Option<String>,
    progress: i64,
    status: String,
    created_at: String,
    updated_at: String,
}

impl GoalRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            goal_type: row.try_get("goal_type")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            target_date: row.try_get("target_date")?,
            progress: row.try_get("progress")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_goal(self) -> Result<Goal, RepositoryError> {
        let target_date = self
            .target_date
            .map(|d| NaiveDate::parse_from_str(&d, TARGET_DATE_FORMAT))
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid target_date: {e}")))?;
        let progress = u8::try_from(self.progress)
            .map_err(|_| RepositoryError::Query(format!("invalid progress: {}", self.progress)))?;
        let status: GoalStatus = self.status.parse().map_err(RepositoryError::Query)?;

        Ok(Goal {
            id: self.id,
            user_id: parse_user_id(self.user_id)?,
            goal_type: self.goal_type,
            title: self.title,
            description: self.description,
            target_date,
            progress,
            status,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// GoalRepository implementation
// ---------------------------------------------------------------------------

impl GoalRepository for SqliteGoalRepository {
    async fn create(&self, goal: &NewGoal) -> Result<i64, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let target_date = goal
            .target_date
            .map(|d| d.format(TARGET_DATE_FORMAT).to_string());

        let result = sqlx::query(
            r#"INSERT INTO goals (user_id, goal_type, title, description, target_date, progress, status, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)"#,
        )
        .bind(goal.user_id.as_str())
        .bind(&goal.goal_type)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(&target_date)
        .bind(GoalStatus::Active.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(db_err)?;

        Ok(result.last_insert_rowid())
    }

    async fn active_goals(&self, user_id: &UserId) -> Result<Vec<Goal>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM goals
               WHERE user_id = ? AND status = ?
               ORDER BY created_at DESC, id DESC"#,
        )
        .bind(user_id.as_str())
        .bind(GoalStatus::Active.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(db_err)?;

        rows.iter()
            .map(|row| GoalRow::from_row(row).map_err(db_err)?.into_goal())
            .collect()
    }

    async fn update_progress(
        &self,
        user_id: &UserId,
        goal_id: i64,
        update: &GoalProgressUpdate,
    ) -> Result<Option<Goal>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(db_err)?;

        let row = sqlx::query("SELECT * FROM goals WHERE id = ? AND user_id = ?")
            .bind(goal_id)
            .bind(user_id.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;

        // Dropping `tx` rolls back.
        let Some(row) = row else {
            return Ok(None);
        };
        let mut goal = GoalRow::from_row(&row).map_err(db_err)?.into_goal()?;

        if let Some(progress) = update.progress {
            goal.progress = progress;
        }
        if let Some(status) = update.status {
            goal.status = status;
        }
        goal.updated_at = Utc::now();

        sqlx::query("UPDATE goals SET progress = ?, status = ?, updated_at = ? WHERE id = ?")
            .bind(i64::from(goal.progress))
            .bind(goal.status.to_string())
            .bind(format_datetime(&goal.updated_at))
            .bind(goal.id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(Some(goal))
    }
}
