//! Memory repository trait definition.

use prism_types::error::RepositoryError;
use prism_types::memory::{MemoryQuery, MemoryRecord, NewMemory};
use prism_types::user::UserId;

/// Repository trait for immutable memory rows.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MemoryRepository: Send + Sync {
    /// Append one memory row. Returns the new row id.
    ///
    /// This is also the side channel through which identity reflections are
    /// recorded (under the system user).
    fn append(
        &self,
        memory: &NewMemory,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Retrieve a user's memories, newest first, capped by `query.limit()`.
    fn retrieve(
        &self,
        user_id: &UserId,
        query: &MemoryQuery,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryRecord>, RepositoryError>> + Send;

    /// List a user's memories of one type, newest first, with an explicit cap.
    fn list_by_type(
        &self,
        user_id: &UserId,
        memory_type: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryRecord>, RepositoryError>> + Send;
}
