pub mod common_enums;
pub mod identifiable;
pub mod index_aware;
pub mod indexable;
pub mod property;

// Re-exports
pub use common_enums::*;
pub use identifiable::*;
pub use index_aware::*;
pub use indexable::*;
pub use property::*;
