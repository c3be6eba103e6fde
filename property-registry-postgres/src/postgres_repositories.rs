use async_trait::async_trait;
use property_registry_db::repository::{PropertyRepository, PropertySession, PropertyStore};
use property_registry_db::RepositoryResult;
use sqlx::PgPool;
use std::sync::Arc;

use crate::repository::property::{PropertyRepoFactory, PropertyRepositoryImpl};
use crate::unit_of_work::PgUnitOfWorkSession;

/// PostgreSQL-backed [`PropertyStore`]
///
/// Every session runs in its own transaction; index cache changes made in a
/// session become visible to other sessions only once it commits.
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
    property_factory: Arc<PropertyRepoFactory>,
}

impl PostgresRepositories {
    pub async fn load(pool: Arc<PgPool>) -> RepositoryResult<Self> {
        let property_factory = PropertyRepoFactory::load(&pool).await?;
        Ok(Self {
            pool,
            property_factory,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin_session(&self) -> RepositoryResult<PostgresPropertySession> {
        let session = PgUnitOfWorkSession::begin(&self.pool).await?;
        let property_repository = self.property_factory.build_property_repo(&session);
        Ok(PostgresPropertySession {
            session,
            property_repository,
        })
    }
}

#[async_trait]
impl PropertyStore for PostgresRepositories {
    async fn begin(&self) -> RepositoryResult<Box<dyn PropertySession>> {
        Ok(Box::new(self.begin_session().await?))
    }
}

pub struct PostgresPropertySession {
    session: PgUnitOfWorkSession,
    property_repository: Arc<PropertyRepositoryImpl>,
}

impl PostgresPropertySession {
    pub fn property_repository(&self) -> &PropertyRepositoryImpl {
        &self.property_repository
    }
}

#[async_trait]
impl PropertySession for PostgresPropertySession {
    fn properties(&self) -> &dyn PropertyRepository {
        self.property_repository.as_ref()
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        self.session.commit().await
    }

    async fn rollback(self: Box<Self>) -> RepositoryResult<()> {
        self.session.rollback().await
    }
}
