//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod emotion;
pub mod goal;
pub mod identity;
pub mod memory;
pub mod pool;
pub mod schema;
pub mod thought;

use chrono::{DateTime, SecondsFormat, Utc};
use prism_types::error::RepositoryError;
use prism_types::user::UserId;

// ---------------------------------------------------------------------------
// Column helpers shared by the repositories
// ---------------------------------------------------------------------------

/// Timestamps are written with a fixed fraction width so that text order
/// matches chronological order.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn parse_json(s: &str) -> Result<serde_json::Value, RepositoryError> {
    serde_json::from_str(s).map_err(|e| RepositoryError::Query(format!("invalid JSON value: {e}")))
}

pub(crate) fn to_json(value: &serde_json::Value) -> Result<String, RepositoryError> {
    serde_json::to_string(value)
        .map_err(|e| RepositoryError::Query(format!("failed to serialize value: {e}")))
}

/// Pool exhaustion and I/O failures mean the store is unreachable; anything
/// else is a failed statement.
pub(crate) fn db_err(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

pub(crate) fn parse_user_id(s: String) -> Result<UserId, RepositoryError> {
    UserId::new(s).ok_or_else(|| RepositoryError::Query("empty user_id".to_string()))
}

#[cfg(test)]
pub(crate) async fn test_pool() -> pool::DatabasePool {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    std::mem::forget(dir);
    pool::DatabasePool::new(&url).await.unwrap()
}
