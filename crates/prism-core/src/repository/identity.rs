//! Identity trait repository definition.

use prism_types::error::RepositoryError;
use prism_types::identity::{IdentityTrait, TraitUpdate};

/// Repository trait for the agent's identity traits.
///
/// Trait names are unique; an upsert replaces value, confidence and
/// timestamp in a single statement.
pub trait IdentityRepository: Send + Sync {
    /// Every trait ever recorded, ordered by name.
    fn snapshot(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<IdentityTrait>, RepositoryError>> + Send;

    /// Insert or fully replace a trait.
    fn upsert_trait(
        &self,
        update: &TraitUpdate,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
