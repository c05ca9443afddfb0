//! Identity service: the agent's persona traits and self-reflections.
//!
//! Reflections are not a separate record category. They are appended to the
//! memory store under the system user with the `self_reflection` type, so
//! this service owns a memory repository alongside the identity repository.

use prism_types::error::RepositoryError;
use prism_types::identity::{IdentityTrait, TraitUpdate};
use prism_types::memory::{MemoryRecord, NewMemory, SELF_REFLECTION_TYPE};
use prism_types::user::UserId;
use tracing::info;

use crate::repository::identity::IdentityRepository;
use crate::repository::memory::MemoryRepository;

/// Orchestrates identity traits and reflection routing.
///
/// Generic over `IdentityRepository` and `MemoryRepository` so prism-core
/// never depends on prism-infra.
pub struct IdentityService<I: IdentityRepository, M: MemoryRepository> {
    identity_repo: I,
    memory_repo: M,
}

impl<I: IdentityRepository, M: MemoryRepository> IdentityService<I, M> {
    pub fn new(identity_repo: I, memory_repo: M) -> Self {
        Self {
            identity_repo,
            memory_repo,
        }
    }

    /// Full trait snapshot. The set is bounded by the number of distinct
    /// trait names ever written, so there is no pagination.
    pub async fn get_identity(&self) -> Result<Vec<IdentityTrait>, RepositoryError> {
        self.identity_repo.snapshot().await
    }

    /// Insert or replace one trait.
    pub async fn update_trait(&self, update: &TraitUpdate) -> Result<(), RepositoryError> {
        self.identity_repo.upsert_trait(update).await?;
        info!(trait_name = %update.name, confidence = update.confidence, "Identity trait updated");
        Ok(())
    }

    /// Record a self-reflection as a system memory. Returns the memory id.
    pub async fn reflect(&self, reflection: &str) -> Result<i64, RepositoryError> {
        let id = self
            .memory_repo
            .append(&NewMemory::reflection(reflection))
            .await?;
        info!(memory_id = id, "Self-reflection recorded");
        Ok(id)
    }

    /// Most recent self-reflections, newest first.
    pub async fn recent_reflections(
        &self,
        limit: i64,
    ) -> Result<Vec<MemoryRecord>, RepositoryError> {
        self.memory_repo
            .list_by_type(&UserId::system(), SELF_REFLECTION_TYPE, limit)
            .await
    }
}
