use async_trait::async_trait;
use property_registry_db::repository::delete_batch::DeleteBatch;
use property_registry_db::RepositoryResult;
use uuid::Uuid;

use super::repo_impl::PropertyRepositoryImpl;
use crate::unit_of_work::transaction_consumed;

#[async_trait]
impl DeleteBatch for PropertyRepositoryImpl {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        Self::delete_batch_impl(self, ids).await
    }
}

impl PropertyRepositoryImpl {
    pub(super) async fn delete_batch_impl(
        repo: &PropertyRepositoryImpl,
        ids: &[Uuid],
    ) -> RepositoryResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = repo.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;

        sqlx::query("DELETE FROM property_idx WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut **transaction)
            .await?;
        let result = sqlx::query("DELETE FROM property WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut **transaction)
            .await?;
        let rows_affected = result.rows_affected() as usize;

        drop(tx);

        for id in ids {
            repo.property_idx_cache.remove(id);
        }
        tracing::debug!(count = rows_affected, "properties deleted");

        Ok(rows_affected)
    }
}
