//! `prism invoke`: run one tool call against the local database.

use anyhow::{bail, Context, Result};
use console::style;
use serde_json::Value;

use prism_types::tool::{ToolCallRequest, ToolEnvelope};

use crate::state::AppState;

/// Parse `--params`, dispatch, and print the envelope.
///
/// # Examples
///
/// ```bash
/// prism invoke identity_tracker --params '{"action":"get_identity"}'
/// prism invoke memory_manager --caller +15550100 \
///     --params '{"action":"retrieve","memory_type":"user_preference"}'
/// ```
pub async fn invoke(
    state: &AppState,
    tool: &str,
    params: Option<&str>,
    caller: Option<String>,
    json: bool,
) -> Result<()> {
    let parameters = parse_params(params)?;
    let request = ToolCallRequest::new(parameters, caller);

    let envelope = state.dispatcher.handle(tool, &request).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    match envelope {
        ToolEnvelope::Success { result } => {
            println!();
            println!("  {} {}", style("✓").green().bold(), style(tool).cyan());
            println!();
            for line in serde_json::to_string_pretty(&result)?.lines() {
                println!("  {line}");
            }
            println!();
            Ok(())
        }
        ToolEnvelope::Failure { error } => bail!("{tool}: {error}"),
    }
}

fn parse_params(raw: Option<&str>) -> Result<Value> {
    match raw {
        None => Ok(Value::Object(Default::default())),
        Some(raw) => serde_json::from_str(raw).context("--params is not valid JSON"),
    }
}
