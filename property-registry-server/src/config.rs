use anyhow::{bail, Context};
use std::str::FromStr;

/// The environment the service is running in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Develop,
    Local,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(environment: &str) -> Result<Self, Self::Err> {
        match environment.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "develop" | "dev" => Ok(Environment::Develop),
            "local" => Ok(Environment::Local),
            other => bail!("could not convert {other} into an environment value"),
        }
    }
}

/// Backing store for property records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => bail!("unknown property store {other}, expected postgres or memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,

    /// The port to listen for HTTP requests on.
    pub port: u16,

    pub store: StoreKind,

    /// The connection URL for the Postgres database; required for the postgres store.
    pub database_url: Option<String>,

    pub database_max_connections: u32,

    /// Consecutive backend failures before the service reports itself disconnected
    pub backend_failure_threshold: u32,

    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let environment = match lookup("ENVIRONMENT") {
            Some(value) => value.parse().context("ENVIRONMENT is invalid")?,
            None => Environment::Production,
        };

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT should be a number")?;

        let store = match lookup("PROPERTY_STORE") {
            Some(value) => value.parse().context("PROPERTY_STORE is invalid")?,
            None => StoreKind::Postgres,
        };

        let database_url = lookup("DATABASE_URL");
        if store == StoreKind::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be provided when PROPERTY_STORE=postgres");
        }

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS should be a number")?;

        let backend_failure_threshold = lookup("BACKEND_FAILURE_THRESHOLD")
            .unwrap_or_else(|| "3".to_string())
            .parse::<u32>()
            .context("BACKEND_FAILURE_THRESHOLD should be a number")?;

        let run_migrations = lookup("RUN_MIGRATIONS")
            .unwrap_or_else(|| "true".to_string())
            .parse::<bool>()
            .context("RUN_MIGRATIONS should be true or false")?;

        Ok(Config {
            environment,
            port,
            store,
            database_url,
            database_max_connections,
            backend_failure_threshold,
            run_migrations,
        })
    }
}
