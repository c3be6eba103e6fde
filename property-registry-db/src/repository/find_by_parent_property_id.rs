use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryResult;
use crate::models::property::PropertyIdxModel;

/// Lookup of secondary properties through the parent index
#[async_trait]
pub trait FindByParentPropertyId: Send + Sync {
    /// Index records of every property whose `parent_property_id` equals the given id
    ///
    /// An id with no secondaries (or an unknown id) yields an empty vector.
    async fn find_by_parent_property_id(
        &self,
        parent_property_id: Uuid,
    ) -> RepositoryResult<Vec<PropertyIdxModel>>;
}
