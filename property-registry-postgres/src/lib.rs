pub mod postgres_repositories;
pub mod repository;
pub mod unit_of_work;
pub mod utils;

pub use postgres_repositories::{PostgresPropertySession, PostgresRepositories};
pub use repository::db_init::run_migrations;
pub use repository::property::PropertyRepositoryImpl;

#[cfg(test)]
pub mod test_helper;
