//! Typed tool actions.
//!
//! Every inbound call is parsed into a [`ToolAction`] before any repository
//! is touched. Parsing checks presence and type of every required field and
//! the range of bounded numbers; an unrecognised `action` string is not an
//! error but the [`ToolAction::Unknown`] variant.

use chrono::NaiveDate;
use prism_types::error::ToolError;
use prism_types::goal::{GoalProgressUpdate, GoalStatus, MAX_PROGRESS};
use prism_types::identity::TraitUpdate;
use prism_types::memory::MemoryQuery;
use prism_types::thought::NewThought;
use prism_types::tool::ToolName;
use serde_json::Value;

use super::params::ToolParams;

#[derive(Debug, Clone, PartialEq)]
pub enum MemoryAction {
    Store {
        memory_type: String,
        content: Value,
        emotion: Option<String>,
        topic: Option<String>,
    },
    Retrieve(MemoryQuery),
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentityAction {
    GetIdentity,
    UpdateTrait(TraitUpdate),
    Reflect(String),
    GrowthInsights,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmotionAction {
    Store {
        emotion: String,
        topic: String,
        response_strategy: String,
    },
    History,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoalAction {
    SetGoal {
        goal_type: String,
        title: String,
        description: String,
        target_date: Option<NaiveDate>,
    },
    GetGoals,
    UpdateProgress {
        goal_id: i64,
        update: GoalProgressUpdate,
    },
}

/// A fully validated tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    Memory(MemoryAction),
    Identity(IdentityAction),
    Emotion(EmotionAction),
    Goal(GoalAction),
    /// The thought logger has no action discriminant: every call logs.
    Thought(NewThought),
    Unknown { tool: ToolName, action: String },
}

impl ToolAction {
    /// Parse the raw parameters of a call to `tool`.
    pub fn parse(tool: ToolName, parameters: &Value) -> Result<Self, ToolError> {
        let params = ToolParams::new(parameters)?;
        match tool {
            ToolName::MemoryManager => parse_memory(params),
            ToolName::IdentityTracker => parse_identity(params),
            ToolName::EmotionAnalyzer => parse_emotion(params),
            ToolName::GoalTracker => parse_goal(params),
            ToolName::ThoughtLogger => parse_thought(params),
        }
    }

    /// The action name, for logging.
    pub fn name(&self) -> &str {
        match self {
            ToolAction::Memory(MemoryAction::Store { .. }) => "store",
            ToolAction::Memory(MemoryAction::Retrieve(_)) => "retrieve",
            ToolAction::Identity(IdentityAction::GetIdentity) => "get_identity",
            ToolAction::Identity(IdentityAction::UpdateTrait(_)) => "update_trait",
            ToolAction::Identity(IdentityAction::Reflect(_)) => "reflect",
            ToolAction::Identity(IdentityAction::GrowthInsights) => "get_growth_insights",
            ToolAction::Emotion(EmotionAction::Store { .. }) => "store_emotional_memory",
            ToolAction::Emotion(EmotionAction::History) => "get_emotional_history",
            ToolAction::Goal(GoalAction::SetGoal { .. }) => "set_goal",
            ToolAction::Goal(GoalAction::GetGoals) => "get_goals",
            ToolAction::Goal(GoalAction::UpdateProgress { .. }) => "update_progress",
            ToolAction::Thought(_) => "log",
            ToolAction::Unknown { action, .. } => action,
        }
    }
}

fn unknown(tool: ToolName, action: &str) -> ToolAction {
    ToolAction::Unknown {
        tool,
        action: action.to_string(),
    }
}

fn parse_memory(params: ToolParams<'_>) -> Result<ToolAction, ToolError> {
    let action = params.action()?;
    let memory = match action {
        "store" => MemoryAction::Store {
            memory_type: params.required_str("memory_type")?.to_string(),
            content: params
                .value("content")
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())),
            emotion: params.optional_str("emotion")?.map(str::to_string),
            topic: params.optional_str("topic")?.map(str::to_string),
        },
        "retrieve" => {
            let memory_type = params.optional_str("memory_type")?.map(str::to_string);
            let query = params.optional_str("query")?.map(str::to_string);
            let query = MemoryQuery::from_parts(memory_type, query)
                .ok_or_else(|| ToolError::missing("memory_type"))?;
            MemoryAction::Retrieve(query)
        }
        other => return Ok(unknown(ToolName::MemoryManager, other)),
    };
    Ok(ToolAction::Memory(memory))
}

fn parse_identity(params: ToolParams<'_>) -> Result<ToolAction, ToolError> {
    let action = params.action()?;
    let identity = match action {
        "get_identity" => IdentityAction::GetIdentity,
        "update_trait" => {
            let name = params.required_str("trait")?;
            params.optional_object("adjustment", "adjustment.")?;
            let adjustment = params
                .value("adjustment")
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default()));
            let update = TraitUpdate::from_adjustment(name, adjustment)
                .map_err(|reason| ToolError::invalid("adjustment.confidence", reason))?;
            IdentityAction::UpdateTrait(update)
        }
        "reflect" => IdentityAction::Reflect(params.required_str("reflection")?.to_string()),
        "get_growth_insights" => IdentityAction::GrowthInsights,
        other => return Ok(unknown(ToolName::IdentityTracker, other)),
    };
    Ok(ToolAction::Identity(identity))
}

fn parse_emotion(params: ToolParams<'_>) -> Result<ToolAction, ToolError> {
    let action = params.action()?;
    let emotion = match action {
        "store_emotional_memory" => EmotionAction::Store {
            emotion: params.required_str("user_emotion")?.to_string(),
            topic: params.optional_str("topic")?.unwrap_or_default().to_string(),
            response_strategy: params
                .optional_str("response_strategy")?
                .unwrap_or_default()
                .to_string(),
        },
        "get_emotional_history" => EmotionAction::History,
        other => return Ok(unknown(ToolName::EmotionAnalyzer, other)),
    };
    Ok(ToolAction::Emotion(emotion))
}

fn parse_goal(params: ToolParams<'_>) -> Result<ToolAction, ToolError> {
    let action = params.action()?;
    let goal = match action {
        "set_goal" => {
            let goal_type = params.required_str("goal_type")?.to_string();
            // Goal fields normally arrive inside `goal_data`; top-level
            // fields are accepted when it is absent.
            let data = params
                .optional_object("goal_data", "goal_data.")?
                .unwrap_or(params);
            let target_date = data
                .optional_str("target_date")?
                .map(|raw| {
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                        ToolError::invalid("target_date", format!("expected YYYY-MM-DD: {e}"))
                    })
                })
                .transpose()?;
            GoalAction::SetGoal {
                goal_type,
                title: data.required_str("title")?.to_string(),
                description: data.optional_str("description")?.unwrap_or_default().to_string(),
                target_date,
            }
        }
        "get_goals" => GoalAction::GetGoals,
        "update_progress" => {
            let goal_id = params.required_i64("goal_id")?;
            let data = params
                .optional_object("progress_update", "progress_update.")?
                .unwrap_or(params);
            let progress = data
                .optional_i64("progress")?
                .map(|p| {
                    u8::try_from(p)
                        .ok()
                        .filter(|p| *p <= MAX_PROGRESS)
                        .ok_or_else(|| {
                            ToolError::invalid("progress", format!("{p} must be within 0..=100"))
                        })
                })
                .transpose()?;
            let status = data
                .optional_str("status")?
                .map(|s| s.parse::<GoalStatus>())
                .transpose()
                .map_err(|reason| ToolError::invalid("status", reason))?;
            let update = GoalProgressUpdate { progress, status };
            if update.is_empty() {
                return Err(ToolError::missing("progress_update.progress"));
            }
            GoalAction::UpdateProgress { goal_id, update }
        }
        other => return Ok(unknown(ToolName::GoalTracker, other)),
    };
    Ok(ToolAction::Goal(goal))
}

fn parse_thought(params: ToolParams<'_>) -> Result<ToolAction, ToolError> {
    Ok(ToolAction::Thought(NewThought {
        thought_type: params.required_str("thought_type")?.to_string(),
        content: params.required_str("thought_content")?.to_string(),
        context: params
            .value("context")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default())),
        outcome: params.optional_str("outcome")?.unwrap_or_default().to_string(),
    }))
}
