use async_trait::async_trait;
use property_registry_db::repository::exist_by_ids::ExistByIds;
use property_registry_db::RepositoryResult;
use uuid::Uuid;

use super::repo_impl::PropertyRepositoryImpl;

#[async_trait]
impl ExistByIds for PropertyRepositoryImpl {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>> {
        // Answered from the index cache, which includes this session's staged writes
        Ok(ids
            .iter()
            .map(|id| (*id, self.property_idx_cache.contains_primary(id)))
            .collect())
    }
}
