//! Thought log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An internal reasoning step about to be logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewThought {
    pub thought_type: String,
    pub content: String,
    pub context: serde_json::Value,
    pub outcome: String,
}

/// A persisted thought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    pub id: i64,
    pub thought_type: String,
    pub content: String,
    pub context: serde_json::Value,
    pub outcome: String,
    pub timestamp: DateTime<Utc>,
}
