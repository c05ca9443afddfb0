//! Memory types for PRISM.
//!
//! A memory is an immutable, timestamped fact recorded about a user (or
//! about the agent itself, under the system user). The content is an opaque
//! JSON blob; `emotion` and `topic` are lifted out of it for search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Memory type under which self-reflections are recorded.
pub const SELF_REFLECTION_TYPE: &str = "self_reflection";

/// Maximum number of rows returned by a type-filtered retrieval.
pub const TYPE_RETRIEVAL_LIMIT: i64 = 5;

/// Maximum number of rows returned by a substring search.
pub const SEARCH_RETRIEVAL_LIMIT: i64 = 10;

/// Importance assigned when the caller does not provide one.
pub const DEFAULT_IMPORTANCE: i64 = 1;

/// A memory about to be written. The timestamp is assigned at persistence time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMemory {
    pub user_id: UserId,
    pub memory_type: String,
    pub content: serde_json::Value,
    pub emotion: String,
    pub topic: String,
    pub importance: i64,
}

impl NewMemory {
    /// Build a memory, lifting `emotion`/`topic` out of the content object
    /// when they are not supplied explicitly.
    pub fn new(
        user_id: UserId,
        memory_type: impl Into<String>,
        content: serde_json::Value,
        emotion: Option<String>,
        topic: Option<String>,
    ) -> Self {
        let from_content = |key: &str| {
            content
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_default()
        };
        let emotion = emotion.unwrap_or_else(|| from_content("emotion"));
        let topic = topic.unwrap_or_else(|| from_content("topic"));

        Self {
            user_id,
            memory_type: memory_type.into(),
            content,
            emotion,
            topic,
            importance: DEFAULT_IMPORTANCE,
        }
    }

    /// A self-reflection recorded under the system user.
    pub fn reflection(text: &str) -> Self {
        Self {
            user_id: UserId::system(),
            memory_type: SELF_REFLECTION_TYPE.to_string(),
            content: serde_json::json!({ "reflection": text }),
            emotion: String::new(),
            topic: String::new(),
            importance: DEFAULT_IMPORTANCE,
        }
    }
}

/// A persisted memory row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: i64,
    pub user_id: UserId,
    pub memory_type: String,
    pub content: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub emotion: Option<String>,
    pub topic: Option<String>,
    pub importance: i64,
}

/// How a retrieval selects rows. Both variants are newest-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryQuery {
    /// Exact `memory_type` match, capped at [`TYPE_RETRIEVAL_LIMIT`].
    ByType(String),
    /// Case-sensitive substring of the serialized content or the topic,
    /// capped at [`SEARCH_RETRIEVAL_LIMIT`].
    Search(String),
}

impl MemoryQuery {
    /// Pick the query mode: a non-empty search string wins over the type
    /// filter. Returns `None` when neither is usable.
    pub fn from_parts(memory_type: Option<String>, query: Option<String>) -> Option<Self> {
        match (memory_type, query) {
            (_, Some(q)) if !q.is_empty() => Some(MemoryQuery::Search(q)),
            (Some(t), _) => Some(MemoryQuery::ByType(t)),
            (None, _) => None,
        }
    }

    pub fn limit(&self) -> i64 {
        match self {
            MemoryQuery::ByType(_) => TYPE_RETRIEVAL_LIMIT,
            MemoryQuery::Search(_) => SEARCH_RETRIEVAL_LIMIT,
        }
    }
}
