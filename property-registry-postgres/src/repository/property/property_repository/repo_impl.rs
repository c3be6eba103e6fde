use async_trait::async_trait;
use parking_lot::RwLock as ParkingRwLock;
use property_registry_db::models::property::{PropertyIdxModel, PropertyModel};
use property_registry_db::{IdxModelCache, RepositoryResult, TransactionAwareIdxModelCache};
use sqlx::{postgres::PgRow, PgExecutor, Row};
use std::sync::Arc;

use crate::unit_of_work::{Executor, TransactionAware};
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct PropertyRepositoryImpl {
    pub executor: Executor,
    pub property_idx_cache: TransactionAwareIdxModelCache<PropertyIdxModel>,
}

impl PropertyRepositoryImpl {
    pub fn new(
        executor: Executor,
        property_idx_cache: Arc<ParkingRwLock<IdxModelCache<PropertyIdxModel>>>,
    ) -> Self {
        Self {
            executor,
            property_idx_cache: TransactionAwareIdxModelCache::new(property_idx_cache),
        }
    }

    pub async fn load_all_property_idx<'e, E>(executor: E) -> RepositoryResult<Vec<PropertyIdxModel>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query(
            "SELECT id, parent_property_id, registration_number_hash FROM property_idx",
        )
        .fetch_all(executor)
        .await?;

        rows.iter().map(PropertyIdxModel::try_from_row).collect()
    }
}

#[async_trait]
impl TransactionAware for PropertyRepositoryImpl {
    async fn on_commit(&self) -> RepositoryResult<()> {
        self.property_idx_cache.on_commit();
        Ok(())
    }

    async fn on_rollback(&self) -> RepositoryResult<()> {
        self.property_idx_cache.on_rollback();
        Ok(())
    }
}

impl TryFromRow<PgRow> for PropertyModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(PropertyModel {
            id: row.try_get("id")?,
            parent_property_id: row.try_get("parent_property_id")?,
            registration_number: get_heapless_string(row, "registration_number")?,
            description: get_heapless_string(row, "description")?,
            address: get_optional_heapless_string(row, "address")?,
            locality: get_optional_heapless_string(row, "locality")?,
            purpose: row.try_get("purpose")?,
            status: row.try_get("status")?,
            total_area: row.try_get("total_area")?,
            built_area: row.try_get("built_area")?,
            document_count: row.try_get("document_count")?,
            registration_date: row.try_get("registration_date")?,
            update_date: row.try_get("update_date")?,
        })
    }
}

impl TryFromRow<PgRow> for PropertyIdxModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(PropertyIdxModel {
            id: row.try_get("id")?,
            parent_property_id: row.try_get("parent_property_id")?,
            registration_number_hash: row.try_get("registration_number_hash")?,
        })
    }
}
