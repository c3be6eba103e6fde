use async_trait::async_trait;
use property_registry_db::models::property::{PropertyIdxModel, PARENT_PROPERTY_ID_KEY};
use property_registry_db::repository::find_by_parent_property_id::FindByParentPropertyId;
use property_registry_db::RepositoryResult;
use uuid::Uuid;

use super::repo_impl::PropertyRepositoryImpl;

#[async_trait]
impl FindByParentPropertyId for PropertyRepositoryImpl {
    async fn find_by_parent_property_id(
        &self,
        parent_property_id: Uuid,
    ) -> RepositoryResult<Vec<PropertyIdxModel>> {
        Ok(self
            .property_idx_cache
            .get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &parent_property_id))
    }
}
