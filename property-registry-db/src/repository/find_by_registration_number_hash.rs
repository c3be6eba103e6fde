use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::property::PropertyIdxModel;

/// Lookup of properties by hashed registration number
///
/// See [`registration_number_hash`](crate::utils::registration_number_hash).
#[async_trait]
pub trait FindByRegistrationNumberHash: Send + Sync {
    async fn find_by_registration_number_hash(
        &self,
        registration_number_hash: i64,
    ) -> RepositoryResult<Vec<PropertyIdxModel>>;
}
