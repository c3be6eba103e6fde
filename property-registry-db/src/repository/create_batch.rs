use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Repository trait for creating multiple entities in a batch
///
/// Implementations insert the entities together with their index records.
/// A batch is rejected as a whole when any entity violates a storage
/// constraint (duplicate id, unknown parent reference).
///
/// # Example
/// ```ignore
/// impl CreateBatch<PropertyModel> for PropertyRepositoryImpl {
///     async fn create_batch(&self, items: Vec<PropertyModel>) -> RepositoryResult<Vec<PropertyModel>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait CreateBatch<T: Identifiable>: Send + Sync {
    /// Persist `items`, returning them as stored
    async fn create_batch(&self, items: Vec<T>) -> RepositoryResult<Vec<T>>;
}
