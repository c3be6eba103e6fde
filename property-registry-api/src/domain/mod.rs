pub mod deletion;
pub mod reconciliation;
pub mod view;

// Re-exports
pub use deletion::*;
pub use reconciliation::*;
pub use view::*;
