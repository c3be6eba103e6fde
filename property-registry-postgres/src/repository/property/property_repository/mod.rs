pub mod create_batch;
pub mod delete_batch;
pub mod exist_by_ids;
pub mod find_by_parent_property_id;
pub mod find_by_registration_number_hash;
pub mod load;
pub mod load_batch;
pub mod load_page;
pub mod repo_impl;
pub mod update_batch;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::PropertyRepositoryImpl;
