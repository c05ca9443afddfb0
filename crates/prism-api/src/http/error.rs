//! Application error type mapping to HTTP status codes and the tool envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use prism_types::error::ToolError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure reported by the dispatcher.
    Tool(ToolError),
    /// The request body could not be read as a tool call.
    BadRequest(String),
}

impl From<ToolError> for AppError {
    fn from(e: ToolError) -> Self {
        AppError::Tool(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Tool(ToolError::UnknownTool(_) | ToolError::GoalNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Tool(ToolError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Tool(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Tool(e) => e.to_string(),
            AppError::BadRequest(msg) => msg,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
