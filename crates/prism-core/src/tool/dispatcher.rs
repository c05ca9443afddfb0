//! Tool dispatcher: routes a (tool, action, parameters) call to a repository.
//!
//! The dispatcher holds no per-request state. For each call it parses the
//! parameters into a [`ToolAction`], resolves the caller where the action is
//! user-scoped, runs the matching repository operation and shapes the
//! result object that goes into the `{"result": ...}` envelope.
//!
//! Unknown actions produce `{"error": "Unknown action: <name>"}` as a
//! *result*; only validation, identity and storage failures become
//! [`ToolError`]s.

use prism_types::emotion::{EmotionalContext, NewEmotionalContext, EMOTIONAL_HISTORY_LIMIT};
use prism_types::error::ToolError;
use prism_types::goal::{Goal, NewGoal};
use prism_types::identity::IdentityTrait;
use prism_types::memory::{MemoryRecord, NewMemory};
use prism_types::thought::NewThought;
use prism_types::tool::{ToolCallRequest, ToolEnvelope, ToolName};
use prism_types::user::UserId;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, warn};

use super::action::{EmotionAction, GoalAction, IdentityAction, MemoryAction, ToolAction};
use super::caller::resolve_caller;
use crate::repository::emotion::EmotionRepository;
use crate::repository::goal::GoalRepository;
use crate::repository::identity::IdentityRepository;
use crate::repository::memory::MemoryRepository;
use crate::repository::thought::ThoughtRepository;
use crate::service::identity::IdentityService;

/// Number of reflections included in growth insights.
const INSIGHT_REFLECTION_LIMIT: i64 = 10;

/// Routes tool calls to the five repositories.
///
/// Generic over every repository trait; `prism-api` pins the SQLite
/// implementations.
pub struct ToolDispatcher<M, I, E, G, T>
where
    M: MemoryRepository,
    I: IdentityRepository,
    E: EmotionRepository,
    G: GoalRepository,
    T: ThoughtRepository,
{
    memories: M,
    identity: IdentityService<I, M>,
    emotions: E,
    goals: G,
    thoughts: T,
    fallback_user: Option<UserId>,
}

impl<M, I, E, G, T> ToolDispatcher<M, I, E, G, T>
where
    M: MemoryRepository,
    I: IdentityRepository,
    E: EmotionRepository,
    G: GoalRepository,
    T: ThoughtRepository,
{
    /// Create a dispatcher with no fallback identity: anonymous callers are
    /// refused for user-scoped tools until [`Self::with_fallback_user`].
    pub fn new(
        memories: M,
        identity: IdentityService<I, M>,
        emotions: E,
        goals: G,
        thoughts: T,
    ) -> Self {
        Self {
            memories,
            identity,
            emotions,
            goals,
            thoughts,
            fallback_user: None,
        }
    }

    /// Set the identity applied to requests that carry none. The reserved
    /// system identity is ignored.
    pub fn with_fallback_user(mut self, fallback: Option<UserId>) -> Self {
        self.fallback_user = fallback.filter(|id| !id.is_system());
        self
    }

    pub fn identity(&self) -> &IdentityService<I, M> {
        &self.identity
    }

    pub fn memories(&self) -> &M {
        &self.memories
    }

    pub fn thoughts(&self) -> &T {
        &self.thoughts
    }

    /// Handle a raw tool call and wrap the outcome in the response envelope.
    pub async fn handle(&self, tool_name: &str, request: &ToolCallRequest) -> ToolEnvelope {
        match self.try_handle(tool_name, request).await {
            Ok(result) => ToolEnvelope::success(result),
            Err(e) => ToolEnvelope::failure(e),
        }
    }

    /// Handle a raw tool call, keeping the error typed so a transport can
    /// map it to a status code.
    pub async fn try_handle(
        &self,
        tool_name: &str,
        request: &ToolCallRequest,
    ) -> Result<Value, ToolError> {
        let result = match tool_name.parse::<ToolName>() {
            Ok(tool) => match resolve_caller(request, self.fallback_user.as_ref()) {
                Ok(caller) => self.dispatch(tool, caller.as_ref(), request.parameters()).await,
                Err(e) => Err(e),
            },
            Err(_) => Err(ToolError::UnknownTool(tool_name.to_string())),
        };

        if let Err(e) = &result {
            if e.is_caller_error() {
                warn!(tool = tool_name, error = %e, "Tool call rejected");
            } else {
                error!(tool = tool_name, error = %e, "Tool call failed");
            }
        }
        result
    }

    /// Validate and execute one call for an already-identified tool.
    pub async fn dispatch(
        &self,
        tool: ToolName,
        caller: Option<&UserId>,
        parameters: &Value,
    ) -> Result<Value, ToolError> {
        let action = ToolAction::parse(tool, parameters)?;
        debug!(tool = %tool, action = action.name(), user_id = ?caller, "Dispatching tool call");

        match action {
            ToolAction::Unknown { tool, action } => {
                warn!(tool = %tool, action = %action, "Unknown tool action");
                Ok(json!({ "error": format!("Unknown action: {action}") }))
            }
            ToolAction::Memory(action) => self.memory(require_caller(caller)?, action).await,
            ToolAction::Identity(action) => self.identity_action(action).await,
            ToolAction::Emotion(action) => self.emotion(require_caller(caller)?, action).await,
            ToolAction::Goal(action) => self.goal(require_caller(caller)?, action).await,
            ToolAction::Thought(thought) => self.thought(&thought).await,
        }
    }

    async fn memory(&self, user_id: &UserId, action: MemoryAction) -> Result<Value, ToolError> {
        match action {
            MemoryAction::Store {
                memory_type,
                content,
                emotion,
                topic,
            } => {
                let memory = NewMemory::new(user_id.clone(), memory_type, content, emotion, topic);
                let id = self.memories.append(&memory).await?;
                info!(user_id = %user_id, memory_type = %memory.memory_type, memory_id = id, "Memory stored");
                Ok(json!({
                    "status": "stored",
                    "message": "Memory saved successfully",
                    "memory_id": id,
                }))
            }
            MemoryAction::Retrieve(query) => {
                let rows = self.memories.retrieve(user_id, &query).await?;
                debug!(user_id = %user_id, count = rows.len(), "Memories retrieved");
                Ok(json!({ "memories": rows.iter().map(memory_json).collect::<Vec<_>>() }))
            }
        }
    }

    async fn identity_action(&self, action: IdentityAction) -> Result<Value, ToolError> {
        match action {
            IdentityAction::GetIdentity => {
                let traits = self.identity.get_identity().await?;
                Ok(json!({ "identity": identity_json(&traits) }))
            }
            IdentityAction::UpdateTrait(update) => {
                self.identity.update_trait(&update).await?;
                Ok(json!({
                    "status": "updated",
                    "trait": update.name,
                    "confidence": update.confidence,
                }))
            }
            IdentityAction::Reflect(reflection) => {
                self.identity.reflect(&reflection).await?;
                Ok(json!({
                    "status": "reflected",
                    "message": "Self-reflection recorded",
                }))
            }
            IdentityAction::GrowthInsights => {
                let traits = self.identity.get_identity().await?;
                let reflections = self
                    .identity
                    .recent_reflections(INSIGHT_REFLECTION_LIMIT)
                    .await?;
                Ok(json!({
                    "traits": identity_json(&traits),
                    "recent_reflections": reflections
                        .iter()
                        .map(|r| json!({
                            "reflection": r.content.get("reflection").cloned().unwrap_or(Value::Null),
                            "timestamp": r.timestamp.to_rfc3339(),
                        }))
                        .collect::<Vec<_>>(),
                }))
            }
        }
    }

    async fn emotion(&self, user_id: &UserId, action: EmotionAction) -> Result<Value, ToolError> {
        match action {
            EmotionAction::Store {
                emotion,
                topic,
                response_strategy,
            } => {
                let entry = NewEmotionalContext {
                    user_id: user_id.clone(),
                    emotion,
                    topic,
                    response_strategy,
                };
                let id = self.emotions.record(&entry).await?;
                info!(user_id = %user_id, emotion = %entry.emotion, entry_id = id, "Emotional context stored");
                Ok(json!({
                    "status": "stored",
                    "message": "Emotional context saved",
                }))
            }
            EmotionAction::History => {
                let history = self
                    .emotions
                    .history(user_id, EMOTIONAL_HISTORY_LIMIT)
                    .await?;
                Ok(json!({
                    "emotional_history": history.iter().map(emotion_json).collect::<Vec<_>>(),
                }))
            }
        }
    }

    async fn goal(&self, user_id: &UserId, action: GoalAction) -> Result<Value, ToolError> {
        match action {
            GoalAction::SetGoal {
                goal_type,
                title,
                description,
                target_date,
            } => {
                let goal = NewGoal {
                    user_id: user_id.clone(),
                    goal_type,
                    title,
                    description,
                    target_date,
                };
                let id = self.goals.create(&goal).await?;
                info!(user_id = %user_id, goal_id = id, goal_type = %goal.goal_type, "Goal created");
                Ok(json!({
                    "status": "created",
                    "message": "Goal set successfully",
                    "goal_id": id,
                }))
            }
            GoalAction::GetGoals => {
                let goals = self.goals.active_goals(user_id).await?;
                Ok(json!({ "active_goals": goals.iter().map(goal_json).collect::<Vec<_>>() }))
            }
            GoalAction::UpdateProgress { goal_id, update } => {
                let goal = self
                    .goals
                    .update_progress(user_id, goal_id, &update)
                    .await?
                    .ok_or(ToolError::GoalNotFound(goal_id))?;
                info!(user_id = %user_id, goal_id, progress = goal.progress, status = %goal.status, "Goal progress updated");
                Ok(json!({
                    "status": "progress_updated",
                    "goal_id": goal.id,
                    "progress": goal.progress,
                    "goal_status": goal.status.to_string(),
                }))
            }
        }
    }

    async fn thought(&self, thought: &NewThought) -> Result<Value, ToolError> {
        let id = self.thoughts.log(thought).await?;
        debug!(thought_type = %thought.thought_type, thought_id = id, "Thought logged");
        Ok(json!({
            "status": "logged",
            "message": "Thought process recorded",
        }))
    }
}

fn require_caller(caller: Option<&UserId>) -> Result<&UserId, ToolError> {
    caller.ok_or(ToolError::MissingCaller)
}

fn memory_json(record: &MemoryRecord) -> Value {
    json!({
        "type": record.memory_type,
        "content": record.content,
        "timestamp": record.timestamp.to_rfc3339(),
        "emotion": record.emotion,
        "topic": record.topic,
    })
}

fn identity_json(traits: &[IdentityTrait]) -> Value {
    let map: Map<String, Value> = traits
        .iter()
        .map(|t| {
            (
                t.name.clone(),
                json!({ "value": t.value, "confidence": t.confidence }),
            )
        })
        .collect();
    Value::Object(map)
}

fn emotion_json(entry: &EmotionalContext) -> Value {
    json!({
        "emotion": entry.emotion,
        "topic": entry.topic,
        "strategy": entry.response_strategy,
        "timestamp": entry.timestamp.to_rfc3339(),
    })
}

fn goal_json(goal: &Goal) -> Value {
    json!({
        "id": goal.id,
        "title": goal.title,
        "description": goal.description,
        "type": goal.goal_type,
        "progress": goal.progress,
        "target_date": goal.target_date.map(|d| d.to_string()),
        "created": goal.created_at.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeStore;

    type FakeDispatcher = ToolDispatcher<FakeStore, FakeStore, FakeStore, FakeStore, FakeStore>;

    fn dispatcher(store: &FakeStore) -> FakeDispatcher {
        ToolDispatcher::new(
            store.clone(),
            IdentityService::new(store.clone(), store.clone()),
            store.clone(),
            store.clone(),
            store.clone(),
        )
        .with_fallback_user(UserId::new("default_user"))
    }

    fn call(params: Value, caller: Option<&str>) -> ToolCallRequest {
        ToolCallRequest::new(params, caller.map(str::to_string))
    }

    fn result(envelope: ToolEnvelope) -> Value {
        match envelope {
            ToolEnvelope::Success { result } => result,
            ToolEnvelope::Failure { error } => panic!("expected success, got error: {error}"),
        }
    }

    fn failure(envelope: ToolEnvelope) -> String {
        match envelope {
            ToolEnvelope::Failure { error } => error,
            ToolEnvelope::Success { result } => panic!("expected error, got {result}"),
        }
    }

    #[tokio::test]
    async fn test_store_then_retrieve_by_type() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        let stored = result(
            d.handle(
                "memory_manager",
                &call(
                    json!({
                        "action": "store",
                        "memory_type": "user_preference",
                        "content": {"topic": "coffee", "emotion": "happy"}
                    }),
                    Some("u1"),
                ),
            )
            .await,
        );
        assert_eq!(stored["status"], "stored");

        let found = result(
            d.handle(
                "memory_manager",
                &call(
                    json!({"action": "retrieve", "memory_type": "user_preference"}),
                    Some("u1"),
                ),
            )
            .await,
        );
        let memories = found["memories"].as_array().unwrap();
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0]["type"], "user_preference");
        assert_eq!(memories[0]["topic"], "coffee");
        assert_eq!(memories[0]["emotion"], "happy");
        assert_eq!(memories[0]["content"]["topic"], "coffee");
    }

    #[tokio::test]
    async fn test_unknown_action_is_success_envelope() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        for tool in ["memory_manager", "identity_tracker", "emotion_analyzer", "goal_tracker"] {
            let envelope = d
                .handle(tool, &call(json!({"action": "bogus"}), Some("u1")))
                .await;
            let result = result(envelope);
            assert_eq!(result["error"], "Unknown action: bogus");
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        let err = d
            .try_handle("weather", &call(json!({"action": "get"}), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref t) if t == "weather"));
    }

    #[tokio::test]
    async fn test_missing_field_rejected_before_write() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        let error = failure(
            d.handle(
                "memory_manager",
                &call(json!({"action": "store", "content": {"a": 1}}), Some("u1")),
            )
            .await,
        );
        assert_eq!(error, "missing field: memory_type");
        assert_eq!(store.memory_count(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_caller_uses_fallback() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        d.handle(
            "memory_manager",
            &call(json!({"action": "store", "memory_type": "learning", "content": {"fact": "x"}}), None),
        )
        .await;

        let found = d
            .dispatch(
                ToolName::MemoryManager,
                UserId::new("default_user").as_ref(),
                &json!({"action": "retrieve", "memory_type": "learning"}),
            )
            .await
            .unwrap();
        assert_eq!(found["memories"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_caller_refused_without_fallback() {
        let store = FakeStore::default();
        let d = dispatcher(&store).with_fallback_user(None);

        let err = d
            .try_handle(
                "emotion_analyzer",
                &call(json!({"action": "get_emotional_history"}), None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingCaller));

        // Identity and thoughts are not user-scoped.
        let ok = d
            .try_handle("identity_tracker", &call(json!({"action": "get_identity"}), None))
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_user_isolation() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        d.handle(
            "memory_manager",
            &call(
                json!({"action": "store", "memory_type": "learning", "content": {"topic": "rust"}}),
                Some("u1"),
            ),
        )
        .await;

        let found = result(
            d.handle(
                "memory_manager",
                &call(json!({"action": "retrieve", "query": "rust"}), Some("u2")),
            )
            .await,
        );
        assert!(found["memories"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_system_caller_cannot_touch_reflections() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        d.handle(
            "identity_tracker",
            &call(json!({"action": "reflect", "reflection": "genuine"}), None),
        )
        .await;

        let err = d
            .try_handle(
                "memory_manager",
                &call(
                    json!({
                        "action": "store",
                        "memory_type": "self_reflection",
                        "content": {"reflection": "forged"}
                    }),
                    Some("system"),
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidField { ref field, .. } if field == "caller"));
        assert_eq!(store.memory_count(), 1);

        let err = d
            .try_handle(
                "memory_manager",
                &call(
                    json!({"action": "retrieve", "memory_type": "self_reflection"}),
                    Some(" system "),
                ),
            )
            .await
            .unwrap_err();
        assert!(err.is_caller_error());

        let insights = result(
            d.handle(
                "identity_tracker",
                &call(json!({"action": "get_growth_insights"}), None),
            )
            .await,
        );
        let reflections = insights["recent_reflections"].as_array().unwrap();
        assert_eq!(reflections.len(), 1);
        assert_eq!(reflections[0]["reflection"], "genuine");
    }

    #[tokio::test]
    async fn test_system_fallback_is_ignored() {
        let store = FakeStore::default();
        let d = dispatcher(&store).with_fallback_user(Some(UserId::system()));

        let err = d
            .try_handle(
                "memory_manager",
                &call(json!({"action": "retrieve", "memory_type": "self_reflection"}), None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingCaller));
    }

    #[tokio::test]
    async fn test_identity_actions() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        for confidence in [0.2, 0.7] {
            let updated = result(
                d.handle(
                    "identity_tracker",
                    &call(
                        json!({"action": "update_trait", "trait": "curiosity", "adjustment": {"confidence": confidence}}),
                        None,
                    ),
                )
                .await,
            );
            assert_eq!(updated["status"], "updated");
            assert_eq!(updated["trait"], "curiosity");
        }

        let identity = result(
            d.handle("identity_tracker", &call(json!({"action": "get_identity"}), None))
                .await,
        );
        let traits = identity["identity"].as_object().unwrap();
        assert_eq!(traits.len(), 1);
        assert_eq!(traits["curiosity"]["confidence"], 0.7);
        assert_eq!(traits["curiosity"]["value"]["confidence"], 0.7);
    }

    #[tokio::test]
    async fn test_reflect_and_growth_insights() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        let reflected = result(
            d.handle(
                "identity_tracker",
                &call(json!({"action": "reflect", "reflection": "I interrupt too often"}), None),
            )
            .await,
        );
        assert_eq!(reflected["status"], "reflected");

        let insights = result(
            d.handle(
                "identity_tracker",
                &call(json!({"action": "get_growth_insights"}), None),
            )
            .await,
        );
        assert_eq!(
            insights["recent_reflections"][0]["reflection"],
            "I interrupt too often"
        );

        // Reflections are system memories, invisible to ordinary callers.
        let found = result(
            d.handle(
                "memory_manager",
                &call(json!({"action": "retrieve", "query": "interrupt"}), Some("u1")),
            )
            .await,
        );
        assert!(found["memories"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_emotional_history() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        for emotion in ["anxious", "relieved"] {
            d.handle(
                "emotion_analyzer",
                &call(
                    json!({
                        "action": "store_emotional_memory",
                        "user_emotion": emotion,
                        "topic": "interview",
                        "response_strategy": "reassure"
                    }),
                    Some("u1"),
                ),
            )
            .await;
        }

        let history = result(
            d.handle(
                "emotion_analyzer",
                &call(json!({"action": "get_emotional_history"}), Some("u1")),
            )
            .await,
        );
        let entries = history["emotional_history"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["emotion"], "relieved");
        assert_eq!(entries[0]["strategy"], "reassure");
    }

    #[tokio::test]
    async fn test_goal_lifecycle() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        let created = result(
            d.handle(
                "goal_tracker",
                &call(
                    json!({"action": "set_goal", "goal_type": "learning", "goal_data": {"title": "Learn Rust"}}),
                    Some("u1"),
                ),
            )
            .await,
        );
        assert_eq!(created["status"], "created");
        let goal_id = created["goal_id"].as_i64().unwrap();

        let goals = result(
            d.handle("goal_tracker", &call(json!({"action": "get_goals"}), Some("u1")))
                .await,
        );
        assert_eq!(goals["active_goals"][0]["title"], "Learn Rust");
        assert_eq!(goals["active_goals"][0]["progress"], 0);

        let updated = result(
            d.handle(
                "goal_tracker",
                &call(
                    json!({"action": "update_progress", "goal_id": goal_id, "progress_update": {"progress": 100, "status": "completed"}}),
                    Some("u1"),
                ),
            )
            .await,
        );
        assert_eq!(updated["goal_status"], "completed");

        let goals = result(
            d.handle("goal_tracker", &call(json!({"action": "get_goals"}), Some("u1")))
                .await,
        );
        assert!(goals["active_goals"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_progress_on_foreign_goal_not_found() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        let created = result(
            d.handle(
                "goal_tracker",
                &call(
                    json!({"action": "set_goal", "goal_type": "career", "goal_data": {"title": "Promotion"}}),
                    Some("u1"),
                ),
            )
            .await,
        );
        let goal_id = created["goal_id"].as_i64().unwrap();

        let err = d
            .try_handle(
                "goal_tracker",
                &call(
                    json!({"action": "update_progress", "goal_id": goal_id, "progress_update": {"progress": 10}}),
                    Some("u2"),
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::GoalNotFound(id) if id == goal_id));
    }

    #[tokio::test]
    async fn test_thought_logged() {
        let store = FakeStore::default();
        let d = dispatcher(&store);

        let logged = result(
            d.handle(
                "thought_logger",
                &call(
                    json!({
                        "thought_type": "response_planning",
                        "thought_content": "Lead with empathy",
                        "context": {"turn": 3},
                        "outcome": "empathetic opener"
                    }),
                    None,
                ),
            )
            .await,
        );
        assert_eq!(logged["status"], "logged");

        let thoughts = store.thoughts();
        assert_eq!(thoughts.len(), 1);
        assert_eq!(thoughts[0].context, json!({"turn": 3}));
        assert_eq!(thoughts[0].outcome, "empathetic opener");
    }

    #[tokio::test]
    async fn test_storage_failure_is_error_envelope() {
        let store = FakeStore::unavailable();
        let d = dispatcher(&store);

        let err = d
            .try_handle(
                "emotion_analyzer",
                &call(json!({"action": "get_emotional_history"}), Some("u1")),
            )
            .await
            .unwrap_err();
        assert!(!err.is_caller_error());

        let envelope = d
            .handle(
                "emotion_analyzer",
                &call(json!({"action": "store_emotional_memory", "user_emotion": "calm"}), Some("u1")),
            )
            .await;
        assert!(failure(envelope).contains("database connection error"));
        assert_eq!(store.emotion_count(), 0);
    }
}
