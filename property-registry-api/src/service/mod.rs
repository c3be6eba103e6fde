pub mod deletion;
pub mod health;
pub mod hierarchy;
pub mod reconciliation;
pub mod registration;

// Re-exports
pub use deletion::*;
pub use health::*;
pub use hierarchy::*;
pub use reconciliation::*;
pub use registration::*;

use property_registry_db::repository::PropertySession;

/// Ends a session without committing it, logging rollback failures
pub async fn rollback_quietly(session: Box<dyn PropertySession>) {
    if let Err(e) = session.rollback().await {
        tracing::warn!(error = %e, "failed to roll back property session");
    }
}
