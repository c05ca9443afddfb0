//! Emotional context types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Maximum number of entries returned by an emotional history lookup.
pub const EMOTIONAL_HISTORY_LIMIT: i64 = 10;

/// A detected user emotion paired with the strategy chosen in response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmotionalContext {
    pub user_id: UserId,
    pub emotion: String,
    pub topic: String,
    pub response_strategy: String,
}

/// A persisted emotional context row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalContext {
    pub id: i64,
    pub user_id: UserId,
    pub emotion: String,
    pub topic: String,
    pub response_strategy: String,
    pub timestamp: DateTime<Utc>,
    /// Not written by any current action; kept for later scoring.
    pub effectiveness_score: Option<i64>,
}
