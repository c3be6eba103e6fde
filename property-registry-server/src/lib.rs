pub mod api;
pub mod config;
pub mod context;
pub mod logging;

use anyhow::Context;
use property_registry_db::memory::InMemoryPropertyStore;
use property_registry_db::repository::PropertyStore;
use property_registry_postgres::{run_migrations, PostgresRepositories};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::config::{Config, StoreKind};

/// Connects the configured backing store
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn PropertyStore>> {
    match config.store {
        StoreKind::Memory => {
            tracing::warn!("using the in-memory property store, data is lost on restart");
            Ok(Arc::new(InMemoryPropertyStore::new()))
        }
        StoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres store")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .context("could not connect to DATABASE_URL")?;

            if config.run_migrations {
                run_migrations(&pool)
                    .await
                    .context("failed to run database migrations")?;
                tracing::info!("database migrations applied");
            }

            let repositories = PostgresRepositories::load(Arc::new(pool))
                .await
                .context("failed to load the property index")?;
            Ok(Arc::new(repositories))
        }
    }
}
