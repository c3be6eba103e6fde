pub mod factory;
pub mod property_repository;

pub use factory::PropertyRepoFactory;
pub use property_repository::PropertyRepositoryImpl;
