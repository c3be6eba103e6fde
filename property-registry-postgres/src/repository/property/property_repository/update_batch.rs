use async_trait::async_trait;
use property_registry_db::models::index_aware::IndexAware;
use property_registry_db::models::property::PropertyModel;
use property_registry_db::repository::update_batch::UpdateBatch;
use property_registry_db::{RepositoryError, RepositoryResult};

use super::repo_impl::PropertyRepositoryImpl;
use crate::unit_of_work::transaction_consumed;

#[async_trait]
impl UpdateBatch<PropertyModel> for PropertyRepositoryImpl {
    async fn update_batch(&self, items: Vec<PropertyModel>) -> RepositoryResult<Vec<PropertyModel>> {
        Self::update_batch_impl(self, items).await
    }
}

impl PropertyRepositoryImpl {
    pub(super) async fn update_batch_impl(
        repo: &PropertyRepositoryImpl,
        items: Vec<PropertyModel>,
    ) -> RepositoryResult<Vec<PropertyModel>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut indices = Vec::with_capacity(items.len());

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;

        for item in &items {
            let result = sqlx::query(
                r#"
                UPDATE property SET
                    parent_property_id = $2,
                    registration_number = $3,
                    description = $4,
                    address = $5,
                    locality = $6,
                    purpose = $7,
                    status = $8,
                    total_area = $9,
                    built_area = $10,
                    document_count = $11,
                    registration_date = $12,
                    update_date = $13
                WHERE id = $1
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

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound(item.id));
            }

            let idx = item.to_index();
            sqlx::query(
                r#"
                UPDATE property_idx
                SET parent_property_id = $2, registration_number_hash = $3
                WHERE id = $1
                "#,
            )
            .bind(idx.id)
            .bind(idx.parent_property_id)
            .bind(idx.registration_number_hash)
            .execute(&mut **transaction)
            .await?;

            indices.push(idx);
        }

        drop(tx);

        for idx in indices {
            repo.property_idx_cache.update(idx);
        }

        Ok(items)
    }
}

#[cfg(test)]
#[serial_test::serial]
mod tests {
    use property_registry_db::repository::{CreateBatch, FindByParentPropertyId, Load, UpdateBatch};
    use property_registry_db::RepositoryError;
    use rust_decimal::Decimal;

    use super::super::test_utils::test_utils::create_test_property;
    use crate::test_helper::setup_test_context;

    #[tokio::test]
    #[ignore = "requires a PostgreSQL server at DATABASE_URL"]
    async fn test_update_batch_moves_secondary() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let repo = ctx.property_repository();

        let first = create_test_property(None);
        let second = create_test_property(None);
        let mut secondary = create_test_property(Some(first.id));
        repo.create_batch(vec![first.clone(), second.clone(), secondary.clone()])
            .await?;

        secondary.parent_property_id = Some(second.id);
        secondary.total_area = Decimal::new(12345, 2);
        repo.update_batch(vec![secondary.clone()]).await?;

        assert!(repo.find_by_parent_property_id(first.id).await?.is_empty());
        assert_eq!(repo.find_by_parent_property_id(second.id).await?.len(), 1);
        assert_eq!(repo.load(secondary.id).await?.total_area, secondary.total_area);

        let unknown = create_test_property(None);
        let result = repo.update_batch(vec![unknown.clone()]).await;
        assert_eq!(result, Err(RepositoryError::NotFound(unknown.id)));

        Ok(())
    }
}
