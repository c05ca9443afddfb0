//! Caller identity.

use serde::{Deserialize, Serialize};

use std::fmt;

/// User id under which the agent records its own reflections.
pub const SYSTEM_USER_ID: &str = "system";

/// Fallback user id used when a request carries no caller identity and the
/// configuration does not override it. Records stored under it are shared by
/// every anonymous caller.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Identifier of the user a record belongs to.
///
/// Opaque text supplied by the dialogue runtime (typically the caller's
/// phone number). Retrieval never crosses user boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a raw identifier. Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == raw.len() {
            Some(Self(raw))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The reserved identity used for the agent's own records.
    pub fn system() -> Self {
        Self(SYSTEM_USER_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reserved agent identity. Callers may never act
    /// under it.
    pub fn is_system(&self) -> bool {
        self.0 == SYSTEM_USER_ID
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
