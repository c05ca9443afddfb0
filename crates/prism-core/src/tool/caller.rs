//! Caller identity resolution.

use prism_types::error::ToolError;
use prism_types::tool::ToolCallRequest;
use prism_types::user::UserId;

/// Derive the caller's user id from the request context.
///
/// Uses the customer phone number of the call when present. Otherwise the
/// explicit `fallback` applies; with no fallback the caller is anonymous and
/// user-scoped actions must be refused.
///
/// The reserved system identity holds the agent's own reflections and is
/// refused whichever way it arrives.
pub fn resolve_caller(
    request: &ToolCallRequest,
    fallback: Option<&UserId>,
) -> Result<Option<UserId>, ToolError> {
    let caller = request
        .phone_number()
        .and_then(UserId::new)
        .or_else(|| fallback.cloned());

    match caller {
        Some(id) if id.is_system() => Err(ToolError::invalid(
            "caller",
            format!("'{id}' is a reserved identity"),
        )),
        other => Ok(other),
    }
}
