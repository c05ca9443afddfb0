use thiserror::Error;

/// Errors from repository operations (used by trait definitions in prism-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors raised while handling a tool call.
///
/// Unknown *actions* are not errors: they are reported as a structured
/// result so the dialogue runtime can recover. Everything here ends up in
/// the `{"error": ...}` envelope.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: '{0}'")]
    UnknownTool(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("missing caller identity")]
    MissingCaller,

    #[error("goal not found: {0}")]
    GoalNotFound(i64),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ToolError {
    pub fn missing(field: &str) -> Self {
        ToolError::MissingField(field.to_string())
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ToolError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix this error by changing the request.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, ToolError::Repository(_))
    }
}
