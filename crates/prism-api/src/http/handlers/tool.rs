//! Tool-call endpoint.
//!
//! - POST /api/{tool} - run one tool call; the path names the category and
//!   any `functionCall.name` in the body is ignored.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use tracing::Instrument;

use prism_types::tool::{ToolCallRequest, ToolEnvelope};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/{tool}
///
/// An empty body is treated as a request with no parameters, which the
/// dispatcher rejects for a missing `action` where one is required.
pub async fn call_tool(
    State(state): State<AppState>,
    Path(tool): Path<String>,
    body: Bytes,
) -> Result<Json<ToolEnvelope>, AppError> {
    let request_id = uuid::Uuid::now_v7();
    let span = tracing::info_span!("tool_call", %request_id, tool = %tool);

    async move {
        let request: ToolCallRequest = if body.is_empty() {
            ToolCallRequest::default()
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))?
        };

        let result = state.dispatcher.try_handle(&tool, &request).await?;
        Ok(Json(ToolEnvelope::success(result)))
    }
    .instrument(span)
    .await
}
