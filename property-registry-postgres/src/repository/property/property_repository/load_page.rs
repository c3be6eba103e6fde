use async_trait::async_trait;
use property_registry_db::models::property::PropertyModel;
use property_registry_db::repository::load_page::LoadPage;
use property_registry_db::repository::pagination::{Page, PageRequest};
use property_registry_db::RepositoryResult;

use super::repo_impl::PropertyRepositoryImpl;
use crate::unit_of_work::transaction_consumed;
use crate::utils::TryFromRow;

#[async_trait]
impl LoadPage<PropertyModel> for PropertyRepositoryImpl {
    async fn load_page(&self, page: PageRequest) -> RepositoryResult<Page<PropertyModel>> {
        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(transaction_consumed)?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM property")
                .fetch_one(&mut **transaction)
                .await?;
            let rows = sqlx::query(
                "SELECT * FROM property ORDER BY registration_number, id LIMIT $1 OFFSET $2",
            )
            .bind(i64::try_from(page.limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset).unwrap_or(i64::MAX))
            .fetch_all(&mut **transaction)
            .await?;
            (total, rows)
        };

        let items = rows
            .iter()
            .map(PropertyModel::try_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(Page::new(items, total.max(0) as usize, page.limit, page.offset))
    }
}
