use async_trait::async_trait;
use property_registry_db::models::index_aware::IndexAware;
use property_registry_db::models::property::PropertyModel;
use property_registry_db::repository::create_batch::CreateBatch;
use property_registry_db::RepositoryResult;

use super::repo_impl::PropertyRepositoryImpl;
use crate::unit_of_work::transaction_consumed;

#[async_trait]
impl CreateBatch<PropertyModel> for PropertyRepositoryImpl {
    async fn create_batch(&self, items: Vec<PropertyModel>) -> RepositoryResult<Vec<PropertyModel>> {
        Self::create_batch_impl(self, items).await
    }
}

impl PropertyRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &PropertyRepositoryImpl,
        items: Vec<PropertyModel>,
    ) -> RepositoryResult<Vec<PropertyModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::with_capacity(items.len());
        let mut indices = Vec::with_capacity(items.len());

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO property (
                    id, parent_property_id, registration_number, description,
                    address, locality, purpose, status, total_area, built_area,
                    document_count, registration_date, update_date
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(item.id)
            .bind(item.parent_property_id)
            .bind(item.registration_number.as_str())
            .bind(item.description.as_str())
            .bind(item.address.as_ref().map(|s| s.as_str()))
            .bind(item.locality.as_ref().map(|s| s.as_str()))
            .bind(item.purpose)
            .bind(item.status)
            .bind(item.total_area)
            .bind(item.built_area)
            .bind(item.document_count)
            .bind(item.registration_date)
            .bind(item.update_date)
            .execute(&mut **transaction)
            .await?;

            let idx = item.to_index();
            sqlx::query(
                r#"
                INSERT INTO property_idx (id, parent_property_id, registration_number_hash)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(idx.id)
            .bind(idx.parent_property_id)
            .bind(idx.registration_number_hash)
            .execute(&mut **transaction)
            .await?;

            indices.push(idx);
            saved_items.push(item);
        }

        drop(tx);

        for idx in indices {
            repo.property_idx_cache.add(idx);
        }
        tracing::debug!(count = saved_items.len(), "properties inserted");

        Ok(saved_items)
    }
}

#[cfg(test)]
#[serial_test::serial]
mod tests {
    use property_registry_db::repository::{CreateBatch, FindByParentPropertyId};
    use property_registry_db::RepositoryError;
    use uuid::Uuid;

    use super::super::test_utils::test_utils::create_test_property;
    use crate::test_helper::setup_test_context;

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server at DATABASE_URL"]
    async fn test_create_batch_stages_index_entries() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = ctx.property_repository();

        let principal = create_test_property(None);
        let secondary = create_test_property(Some(principal.id));
        repo.create_batch(vec![principal.clone(), secondary.clone()])
            .await?;

        assert!(repo.property_idx_cache.contains_primary(&principal.id));
        let found = repo.find_by_parent_property_id(principal.id).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, secondary.id);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server at DATABASE_URL"]
    async fn test_create_with_missing_parent_is_conflict() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = ctx.property_repository();

        let orphan = create_test_property(Some(Uuid::new_v4()));
        let result = repo.create_batch(vec![orphan]).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        Ok(())
    }
}
