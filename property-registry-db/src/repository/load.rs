use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::identifiable::Identifiable;

/// Repository trait for loading a single entity by its ID
#[async_trait]
pub trait Load<T: Identifiable>: Send + Sync {
    /// Load an entity by its unique identifier
    ///
    /// # Returns
    /// * `Ok(T)` - The loaded entity
    /// * `Err(RepositoryError::NotFound)` - No entity has this id
    async fn load(&self, id: Uuid) -> RepositoryResult<T>;
}
