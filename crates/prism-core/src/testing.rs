//! In-memory repository fakes shared by the unit tests of this crate.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use prism_types::emotion::{EmotionalContext, NewEmotionalContext};
use prism_types::error::RepositoryError;
use prism_types::goal::{Goal, GoalProgressUpdate, GoalStatus, NewGoal};
use prism_types::identity::{IdentityTrait, TraitUpdate};
use prism_types::memory::{MemoryQuery, MemoryRecord, NewMemory};
use prism_types::thought::{NewThought, Thought};
use prism_types::user::UserId;

use crate::repository::emotion::EmotionRepository;
use crate::repository::goal::GoalRepository;
use crate::repository::identity::IdentityRepository;
use crate::repository::memory::MemoryRepository;
use crate::repository::thought::ThoughtRepository;

/// One shared in-memory store implementing every repository trait.
///
/// Clones share state, mirroring several SQLite repositories over one pool.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    next_id: i64,
    unavailable: bool,
    memories: Vec<MemoryRecord>,
    traits: BTreeMap<String, IdentityTrait>,
    emotions: Vec<EmotionalContext>,
    goals: Vec<Goal>,
    thoughts: Vec<Thought>,
}

impl FakeState {
    fn check(&mut self) -> Result<i64, RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::Connection);
        }
        self.next_id += 1;
        Ok(self.next_id)
    }
}

impl FakeStore {
    /// A store whose every operation fails as if the database were gone.
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.state.lock().unwrap().unavailable = true;
        store
    }

    pub fn memory_count(&self) -> usize {
        self.state.lock().unwrap().memories.len()
    }

    pub fn thoughts(&self) -> Vec<Thought> {
        self.state.lock().unwrap().thoughts.clone()
    }

    pub fn emotion_count(&self) -> usize {
        self.state.lock().unwrap().emotions.len()
    }
}

impl MemoryRepository for FakeStore {
    async fn append(&self, memory: &NewMemory) -> Result<i64, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let id = state.check()?;
        state.memories.push(MemoryRecord {
            id,
            user_id: memory.user_id.clone(),
            memory_type: memory.memory_type.clone(),
            content: memory.content.clone(),
            timestamp: Utc::now(),
            emotion: Some(memory.emotion.clone()),
            topic: Some(memory.topic.clone()),
            importance: memory.importance,
        });
        Ok(id)
    }

    async fn retrieve(
        &self,
        user_id: &UserId,
        query: &MemoryQuery,
    ) -> Result<Vec<MemoryRecord>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        Ok(state
            .memories
            .iter()
            .rev()
            .filter(|m| &m.user_id == user_id)
            .filter(|m| match query {
                MemoryQuery::ByType(t) => &m.memory_type == t,
                MemoryQuery::Search(q) => {
                    m.content.to_string().contains(q.as_str())
                        || m.topic.as_deref().is_some_and(|t| t.contains(q.as_str()))
                }
            })
            .take(query.limit() as usize)
            .cloned()
            .collect())
    }

    async fn list_by_type(
        &self,
        user_id: &UserId,
        memory_type: &str,
        limit: i64,
    ) -> Result<Vec<MemoryRecord>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        Ok(state
            .memories
            .iter()
            .rev()
            .filter(|m| &m.user_id == user_id && m.memory_type == memory_type)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

impl IdentityRepository for FakeStore {
    async fn snapshot(&self) -> Result<Vec<IdentityTrait>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        Ok(state.traits.values().cloned().collect())
    }

    async fn upsert_trait(&self, update: &TraitUpdate) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        state.traits.insert(
            update.name.clone(),
            IdentityTrait {
                name: update.name.clone(),
                value: update.value.clone(),
                confidence: update.confidence,
                last_updated: Utc::now(),
            },
        );
        Ok(())
    }
}

impl EmotionRepository for FakeStore {
    async fn record(&self, entry: &NewEmotionalContext) -> Result<i64, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let id = state.check()?;
        state.emotions.push(EmotionalContext {
            id,
            user_id: entry.user_id.clone(),
            emotion: entry.emotion.clone(),
            topic: entry.topic.clone(),
            response_strategy: entry.response_strategy.clone(),
            timestamp: Utc::now(),
            effectiveness_score: None,
        });
        Ok(id)
    }

    async fn history(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<EmotionalContext>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        Ok(state
            .emotions
            .iter()
            .rev()
            .filter(|e| &e.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

impl GoalRepository for FakeStore {
    async fn create(&self, goal: &NewGoal) -> Result<i64, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let id = state.check()?;
        let now = Utc::now();
        state.goals.push(Goal {
            id,
            user_id: goal.user_id.clone(),
            goal_type: goal.goal_type.clone(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            target_date: goal.target_date,
            progress: 0,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn active_goals(&self, user_id: &UserId) -> Result<Vec<Goal>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        Ok(state
            .goals
            .iter()
            .rev()
            .filter(|g| &g.user_id == user_id && g.status == GoalStatus::Active)
            .cloned()
            .collect())
    }

    async fn update_progress(
        &self,
        user_id: &UserId,
        goal_id: i64,
        update: &GoalProgressUpdate,
    ) -> Result<Option<Goal>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        let Some(goal) = state
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id && &g.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(progress) = update.progress {
            goal.progress = progress;
        }
        if let Some(status) = update.status {
            goal.status = status;
        }
        goal.updated_at = Utc::now();
        Ok(Some(goal.clone()))
    }
}

impl ThoughtRepository for FakeStore {
    async fn log(&self, thought: &NewThought) -> Result<i64, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let id = state.check()?;
        state.thoughts.push(Thought {
            id,
            thought_type: thought.thought_type.clone(),
            content: thought.content.clone(),
            context: thought.context.clone(),
            outcome: thought.outcome.clone(),
            timestamp: Utc::now(),
        });
        Ok(id)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Thought>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        Ok(state.thoughts.iter().rev().take(limit as usize).cloned().collect())
    }
}
