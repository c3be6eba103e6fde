use async_trait::async_trait;
use property_registry_db::models::property::PropertyModel;
use property_registry_db::repository::load_batch::LoadBatch;
use property_registry_db::RepositoryResult;
use std::collections::HashMap;
use uuid::Uuid;

use super::repo_impl::PropertyRepositoryImpl;
use crate::unit_of_work::transaction_consumed;
use crate::utils::TryFromRow;

#[async_trait]
impl LoadBatch<PropertyModel> for PropertyRepositoryImpl {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<PropertyModel>>> {
        Self::load_batch_impl(self, ids).await
    }
}

impl PropertyRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &PropertyRepositoryImpl,
        ids: &[Uuid],
    ) -> RepositoryResult<Vec<Option<PropertyModel>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;
            sqlx::query("SELECT * FROM property WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut loaded_map = HashMap::with_capacity(rows.len());
        for row in rows {
            let item = PropertyModel::try_from_row(&row)?;
            loaded_map.insert(item.id, item);
        }

        Ok(ids.iter().map(|id| loaded_map.get(id).cloned()).collect())
    }
}

#[cfg(test)]
#[serial_test::serial]
mod tests {
    use property_registry_db::repository::{CreateBatch, LoadBatch};
    use uuid::Uuid;

    use super::super::test_utils::test_utils::create_test_property;
    use crate::test_helper::setup_test_context;

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server at DATABASE_URL"]
    async fn test_load_batch_keeps_requested_order() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = ctx.property_repository();

        let first = create_test_property(None);
        let second = create_test_property(None);
        repo.create_batch(vec![first.clone(), second.clone()]).await?;

        let unknown = Uuid::new_v4();
        let loaded = repo.load_batch(&[second.id, unknown, first.id]).await?;
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].as_ref().map(|p| p.id), Some(second.id));
        assert!(loaded[1].is_none());
        assert_eq!(loaded[2].as_ref().map(|p| p.id), Some(first.id));

        Ok(())
    }
}
