//! Goal repository trait definition.

use prism_types::error::RepositoryError;
use prism_types::goal::{Goal, GoalProgressUpdate, NewGoal};
use prism_types::user::UserId;

/// Repository trait for user goals.
pub trait GoalRepository: Send + Sync {
    /// Create a goal with progress 0 and status `active`. Returns the new id.
    fn create(
        &self,
        goal: &NewGoal,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// All of a user's active goals, newest first. Unbounded.
    fn active_goals(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Goal>, RepositoryError>> + Send;

    /// Apply a progress/status change to one of the user's goals, together
    /// with `updated_at`, in a single transaction.
    ///
    /// Returns the updated goal, or `None` if the user owns no goal with
    /// that id.
    fn update_progress(
        &self,
        user_id: &UserId,
        goal_id: i64,
        update: &GoalProgressUpdate,
    ) -> impl std::future::Future<Output = Result<Option<Goal>, RepositoryError>> + Send;
}
