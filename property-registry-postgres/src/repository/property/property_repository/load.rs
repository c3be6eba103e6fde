use async_trait::async_trait;
use property_registry_db::models::property::PropertyModel;
use property_registry_db::repository::load::Load;
use property_registry_db::{RepositoryError, RepositoryResult};
use uuid::Uuid;

use super::repo_impl::PropertyRepositoryImpl;
use crate::unit_of_work::transaction_consumed;
use crate::utils::TryFromRow;

#[async_trait]
impl Load<PropertyModel> for PropertyRepositoryImpl {
    async fn load(&self, id: Uuid) -> RepositoryResult<PropertyModel> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;
            sqlx::query("SELECT * FROM property WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **transaction)
                .await?
        };

        match row {
            Some(row) => PropertyModel::try_from_row(&row),
            None => Err(RepositoryError::NotFound(id)),
        }
    }
}
