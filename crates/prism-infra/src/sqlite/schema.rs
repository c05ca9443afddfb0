//! Schema bootstrap for the PRISM store.
//!
//! Five independent tables, no foreign keys. Every statement is
//! `IF NOT EXISTS`, so [`ensure_schema`] is safe to run at every startup.

use sqlx::{Executor, SqlitePool};

const CREATE_MEMORIES: &str = r#"
CREATE TABLE IF NOT EXISTS memories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    memory_type TEXT NOT NULL,
    content TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    emotion TEXT,
    topic TEXT,
    importance INTEGER NOT NULL DEFAULT 1
)
"#;

const CREATE_IDENTITY_TRAITS: &str = r#"
CREATE TABLE IF NOT EXISTS identity_traits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    trait_name TEXT NOT NULL UNIQUE,
    trait_value TEXT NOT NULL,
    confidence_level REAL NOT NULL DEFAULT 0.5,
    last_updated TEXT NOT NULL
)
"#;

const CREATE_EMOTIONAL_CONTEXT: &str = r#"
CREATE TABLE IF NOT EXISTS emotional_context (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    emotion TEXT NOT NULL,
    topic TEXT NOT NULL DEFAULT '',
    response_strategy TEXT NOT NULL DEFAULT '',
    timestamp TEXT NOT NULL,
    effectiveness_score INTEGER
)
"#;

const CREATE_GOALS: &str = r#"
CREATE TABLE IF NOT EXISTS goals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    goal_type TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    target_date TEXT,
    progress INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

const CREATE_THOUGHTS: &str = r#"
CREATE TABLE IF NOT EXISTS thoughts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    thought_type TEXT NOT NULL,
    content TEXT NOT NULL,
    context TEXT NOT NULL DEFAULT '{}',
    outcome TEXT NOT NULL DEFAULT '',
    timestamp TEXT NOT NULL
)
"#;

const CREATE_INDICES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_memories_user_type_ts ON memories(user_id, memory_type, timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_emotional_context_user_ts ON emotional_context(user_id, timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_goals_user_status_created ON goals(user_id, status, created_at)",
];

/// Create every table and index the repositories rely on.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for ddl in [
        CREATE_MEMORIES,
        CREATE_IDENTITY_TRAITS,
        CREATE_EMOTIONAL_CONTEXT,
        CREATE_GOALS,
        CREATE_THOUGHTS,
    ] {
        pool.execute(ddl).await?;
    }

    for ddl in CREATE_INDICES {
        pool.execute(ddl).await?;
    }

    tracing::debug!("SQLite schema ensured");
    Ok(())
}
