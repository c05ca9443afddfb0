//! Tool-call envelopes exchanged with the dialogue runtime.
//!
//! Inbound:
//! ```json
//! {
//!   "message": { "functionCall": { "name": "memory_manager", "parameters": { "action": "store" } } },
//!   "call": { "customer": { "phoneNumber": "+15550100" } }
//! }
//! ```
//! Outbound: `{"result": {...}}` on success, `{"error": "..."}` on failure.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// The five tool categories the runtime can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    MemoryManager,
    IdentityTracker,
    EmotionAnalyzer,
    GoalTracker,
    ThoughtLogger,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::MemoryManager,
        ToolName::IdentityTracker,
        ToolName::EmotionAnalyzer,
        ToolName::GoalTracker,
        ToolName::ThoughtLogger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::MemoryManager => "memory_manager",
            ToolName::IdentityTracker => "identity_tracker",
            ToolName::EmotionAnalyzer => "emotion_analyzer",
            ToolName::GoalTracker => "goal_tracker",
            ToolName::ThoughtLogger => "thought_logger",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| format!("unknown tool: '{s}'"))
    }
}

/// Inbound request envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallRequest {
    #[serde(default)]
    pub message: ToolMessage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<CallContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolMessage {
    #[serde(rename = "functionCall", default)]
    pub function_call: FunctionCall,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Category-specific parameters. Kept untyped here; each action parses
    /// the fields it needs.
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// Call metadata from which the caller identity is derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "phoneNumber", default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ToolCallRequest {
    /// Build a request carrying only parameters and an optional caller.
    pub fn new(parameters: serde_json::Value, phone_number: Option<String>) -> Self {
        Self {
            message: ToolMessage {
                function_call: FunctionCall {
                    name: None,
                    parameters,
                },
            },
            call: phone_number.map(|p| CallContext {
                customer: Some(Customer {
                    phone_number: Some(p),
                }),
            }),
        }
    }

    pub fn parameters(&self) -> &serde_json::Value {
        &self.message.function_call.parameters
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.call
            .as_ref()
            .and_then(|c| c.customer.as_ref())
            .and_then(|c| c.phone_number.as_deref())
    }
}

/// Outbound response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolEnvelope {
    Success { result: serde_json::Value },
    Failure { error: String },
}

impl ToolEnvelope {
    pub fn success(result: serde_json::Value) -> Self {
        ToolEnvelope::Success { result }
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        ToolEnvelope::Failure {
            error: error.to_string(),
        }
    }
}
