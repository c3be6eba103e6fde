use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Repository trait for loading multiple entities by their IDs
///
/// Returns items in the same order as the provided IDs.
/// Missing items are represented as None in the result.
///
/// # Example
/// ```ignore
/// let loaded = repo.load_batch(&[principal_id, unknown_id]).await?;
/// assert!(loaded[0].is_some());
/// assert!(loaded[1].is_none());
/// ```
#[async_trait]
pub trait LoadBatch<T: Identifiable>: Send + Sync {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<T>>>;
}
