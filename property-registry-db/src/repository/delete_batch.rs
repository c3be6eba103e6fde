use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;

/// Repository trait for deleting multiple entities in a batch
///
/// Ids that do not resolve to a stored entity are ignored, so the returned
/// count can be lower than `ids.len()`. Deleting an entity that is still
/// referenced by another one (e.g. a principal property with secondaries left)
/// fails with [`RepositoryError::Conflict`](crate::error::RepositoryError::Conflict).
#[async_trait]
pub trait DeleteBatch: Send + Sync {
    /// Delete the entities with the given ids
    ///
    /// # Returns
    /// * `Ok(usize)` - The number of entities removed
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize>;
}
