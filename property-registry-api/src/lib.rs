pub mod domain;
pub mod error;
pub mod ingest;
pub mod service;

pub use domain::*;
pub use error::*;
pub use service::*;
