//! Transaction-scoped unit of work.
//!
//! A [`PgUnitOfWorkSession`] owns one PostgreSQL transaction, shared by every
//! repository built for the session through an [`Executor`]. Repositories that
//! stage in-process state register as [`TransactionAware`] participants and are
//! told whether the transaction committed or rolled back.

use async_trait::async_trait;
use parking_lot::Mutex as ParkingMutex;
use property_registry_db::{RepositoryError, RepositoryResult};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle on the transaction of a session
///
/// The transaction is `None` once the session has been committed or rolled
/// back.
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    async fn take(&self) -> Option<Transaction<'static, Postgres>> {
        self.tx.lock().await.take()
    }
}

pub fn transaction_consumed() -> RepositoryError {
    RepositoryError::Database("transaction has been consumed".to_string())
}

#[async_trait]
pub trait TransactionAware: Send + Sync {
    async fn on_commit(&self) -> RepositoryResult<()>;
    async fn on_rollback(&self) -> RepositoryResult<()>;
}

pub trait UnitOfWorkSession {
    fn executor(&self) -> &Executor;
    fn register_transaction_aware(&self, participant: Arc<dyn TransactionAware>);
}

pub struct PgUnitOfWorkSession {
    executor: Executor,
    participants: ParkingMutex<Vec<Arc<dyn TransactionAware>>>,
}

impl PgUnitOfWorkSession {
    pub async fn begin(pool: &PgPool) -> RepositoryResult<Self> {
        let tx = pool.begin().await?;
        Ok(Self {
            executor: Executor::new(tx),
            participants: ParkingMutex::new(Vec::new()),
        })
    }

    pub async fn commit(self) -> RepositoryResult<()> {
        let tx = self.executor.take().await.ok_or_else(transaction_consumed)?;
        let participants = self.participants.into_inner();

        if let Err(e) = tx.commit().await {
            for participant in &participants {
                participant.on_rollback().await?;
            }
            return Err(e.into());
        }

        for participant in &participants {
            participant.on_commit().await?;
        }
        Ok(())
    }

    pub async fn rollback(self) -> RepositoryResult<()> {
        let participants = self.participants.into_inner();
        let result = match self.executor.take().await {
            Some(tx) => tx.rollback().await.map_err(RepositoryError::from),
            None => Err(transaction_consumed()),
        };

        for participant in &participants {
            participant.on_rollback().await?;
        }
        result
    }
}

impl UnitOfWorkSession for PgUnitOfWorkSession {
    fn executor(&self) -> &Executor {
        &self.executor
    }

    fn register_transaction_aware(&self, participant: Arc<dyn TransactionAware>) {
        self.participants.lock().push(participant);
    }
}
