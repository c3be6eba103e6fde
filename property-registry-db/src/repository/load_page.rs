use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::models::identifiable::Identifiable;
use crate::repository::pagination::{Page, PageRequest};

/// Repository trait for offset-paginated listing
#[async_trait]
pub trait LoadPage<T: Identifiable>: Send + Sync {
    /// Load one page of entities in the repository's stable listing order
    async fn load_page(&self, page: PageRequest) -> RepositoryResult<Page<T>>;
}
