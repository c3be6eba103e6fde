pub mod cache;
pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod utils;

pub use cache::*;
pub use error::*;
pub use models::*;
