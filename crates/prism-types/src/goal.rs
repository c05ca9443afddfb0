//! Goal types for PRISM.
//!
//! Goals are user-scoped objectives with a 0-100 progress counter and a
//! lifecycle status. Only `active` goals are listed back to the agent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::user::UserId;

/// Upper bound of [`Goal::progress`].
pub const MAX_PROGRESS: u8 = 100;

/// Lifecycle status of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Paused,
    Completed,
    Abandoned,
}

impl Default for GoalStatus {
    fn default() -> Self {
        GoalStatus::Active
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Paused => write!(f, "paused"),
            GoalStatus::Completed => write!(f, "completed"),
            GoalStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(GoalStatus::Active),
            "paused" => Ok(GoalStatus::Paused),
            "completed" => Ok(GoalStatus::Completed),
            "abandoned" => Ok(GoalStatus::Abandoned),
            other => Err(format!("invalid goal status: '{other}'")),
        }
    }
}

/// A goal about to be created. Progress starts at 0 and status at `active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub user_id: UserId,
    pub goal_type: String,
    pub title: String,
    pub description: String,
    pub target_date: Option<NaiveDate>,
}

/// A persisted goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: UserId,
    pub goal_type: String,
    pub title: String,
    pub description: String,
    pub target_date: Option<NaiveDate>,
    pub progress: u8,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A progress/status change applied to one goal in a single transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalProgressUpdate {
    pub progress: Option<u8>,
    pub status: Option<GoalStatus>,
}

impl GoalProgressUpdate {
    pub fn is_empty(&self) -> bool {
        self.progress.is_none() && self.status.is_none()
    }
}
