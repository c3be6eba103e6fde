pub mod create_batch;
pub mod delete_batch;
pub mod exist_by_ids;
pub mod find_by_parent_property_id;
pub mod find_by_registration_number_hash;
pub mod load;
pub mod load_batch;
pub mod load_page;
pub mod pagination;
pub mod property_repository;
pub mod store;
pub mod update_batch;

// Re-exports
pub use create_batch::*;
pub use delete_batch::*;
pub use exist_by_ids::*;
pub use find_by_parent_property_id::*;
pub use find_by_registration_number_hash::*;
pub use load::*;
pub use load_batch::*;
pub use load_page::*;
pub use pagination::*;
pub use property_repository::*;
pub use store::*;
pub use update_batch::*;
