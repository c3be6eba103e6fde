use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Repository trait for updating multiple entities in a batch
///
/// Every item fully replaces the stored row with the same id; its index
/// record is refreshed accordingly. There is no optimistic concurrency check,
/// the last write wins.
#[async_trait]
pub trait UpdateBatch<T: Identifiable>: Send + Sync {
    /// # Returns
    /// * `Ok(Vec<T>)` - The updated entities
    /// * `Err(RepositoryError::NotFound)` - One of the items is not stored
    async fn update_batch(&self, items: Vec<T>) -> RepositoryResult<Vec<T>>;
}
