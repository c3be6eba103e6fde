use async_trait::async_trait;

use crate::error::RepositoryResult;
use crate::repository::property_repository::PropertyRepository;

/// Entry point to a property store
///
/// Each call to [`begin`](PropertyStore::begin) opens an independent unit of
/// work. Services that need several independent writes (the cascade delete)
/// open one session per write.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn begin(&self) -> RepositoryResult<Box<dyn PropertySession>>;
}

/// A unit of work against a [`PropertyStore`]
///
/// Dropping a session without calling [`commit`](PropertySession::commit)
/// discards its writes on stores that support it.
#[async_trait]
pub trait PropertySession: Send + Sync {
    fn properties(&self) -> &dyn PropertyRepository;

    async fn commit(self: Box<Self>) -> RepositoryResult<()>;

    async fn rollback(self: Box<Self>) -> RepositoryResult<()>;
}
