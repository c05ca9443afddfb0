//! Thought log repository trait definition.

use prism_types::error::RepositoryError;
use prism_types::thought::{NewThought, Thought};

pub trait ThoughtRepository: Send + Sync {
    /// Log one thought. Returns the new row id.
    fn log(
        &self,
        thought: &NewThought,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Most recent thoughts, newest first.
    fn recent(
        &self,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Thought>, RepositoryError>> + Send;
}
