use async_trait::async_trait;
use property_registry_db::models::property::{PropertyIdxModel, REGISTRATION_NUMBER_HASH_KEY};
use property_registry_db::repository::find_by_registration_number_hash::FindByRegistrationNumberHash;
use property_registry_db::RepositoryResult;

use super::repo_impl::PropertyRepositoryImpl;

#[async_trait]
impl FindByRegistrationNumberHash for PropertyRepositoryImpl {
    async fn find_by_registration_number_hash(
        &self,
        registration_number_hash: i64,
    ) -> RepositoryResult<Vec<PropertyIdxModel>> {
        Ok(self
            .property_idx_cache
            .get_by_i64_index(REGISTRATION_NUMBER_HASH_KEY, &registration_number_hash))
    }
}
