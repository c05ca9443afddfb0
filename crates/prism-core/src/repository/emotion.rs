//! Emotional context repository trait definition.

use prism_types::emotion::{EmotionalContext, NewEmotionalContext};
use prism_types::error::RepositoryError;
use prism_types::user::UserId;

pub trait EmotionRepository: Send + Sync {
    /// Record one emotional context row. Returns the new row id.
    fn record(
        &self,
        entry: &NewEmotionalContext,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// A user's emotional history, newest first.
    fn history(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<EmotionalContext>, RepositoryError>> + Send;
}
