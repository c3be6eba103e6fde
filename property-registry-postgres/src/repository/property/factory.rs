use parking_lot::RwLock as ParkingRwLock;
use property_registry_db::models::property::PropertyIdxModel;
use property_registry_db::{IdxModelCache, RepositoryResult};
use sqlx::PgPool;
use std::sync::Arc;

use super::PropertyRepositoryImpl;
use crate::unit_of_work::UnitOfWorkSession;

/// Factory for property repositories sharing one committed index cache
pub struct PropertyRepoFactory {
    property_idx_cache: Arc<ParkingRwLock<IdxModelCache<PropertyIdxModel>>>,
}

impl PropertyRepoFactory {
    /// Factory whose index cache is warmed from the `property_idx` table
    pub async fn load(pool: &PgPool) -> RepositoryResult<Arc<Self>> {
        let entries = PropertyRepositoryImpl::load_all_property_idx(pool).await?;
        tracing::debug!(count = entries.len(), "property index cache loaded");
        let cache = IdxModelCache::new(entries)?;
        Ok(Arc::new(Self {
            property_idx_cache: Arc::new(ParkingRwLock::new(cache)),
        }))
    }

    /// Build a PropertyRepository bound to the session's transaction
    pub fn build_property_repo(&self, session: &impl UnitOfWorkSession) -> Arc<PropertyRepositoryImpl> {
        let repo = Arc::new(PropertyRepositoryImpl::new(
            session.executor().clone(),
            self.property_idx_cache.clone(),
        ));
        session.register_transaction_aware(repo.clone());
        repo
    }

    pub fn cached_entries(&self) -> usize {
        self.property_idx_cache.read().len()
    }
}
