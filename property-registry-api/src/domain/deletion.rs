use property_registry_db::PropertyModel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A secondary blocking the deletion of its principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentSecondary {
    pub id: Uuid,
    pub registration_number: String,
    pub description: String,
}

impl From<&PropertyModel> for DependentSecondary {
    fn from(property: &PropertyModel) -> Self {
        Self {
            id: property.id,
            registration_number: property.registration_number.to_string(),
            description: property.description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub property_id: Uuid,
    /// Also delete the secondaries of a principal
    pub cascade: bool,
}

impl DeleteRequest {
    pub fn single(property_id: Uuid) -> Self {
        Self {
            property_id,
            cascade: false,
        }
    }

    pub fn cascading(property_id: Uuid) -> Self {
        Self {
            property_id,
            cascade: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionFailure {
    pub id: Uuid,
    pub reason: String,
}

/// Per-record result of a cascade delete.
///
/// Every targeted record (the secondaries and the principal) ends up either
/// in `deleted` or in `failures`, so `succeeded() + failed() == total()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub principal_id: Uuid,
    pub deleted: Vec<Uuid>,
    pub failures: Vec<DeletionFailure>,
}

impl CascadeReport {
    pub fn new(principal_id: Uuid) -> Self {
        Self {
            principal_id,
            deleted: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_deleted(&mut self, id: Uuid) {
        self.deleted.push(id);
    }

    pub fn record_failure(&mut self, id: Uuid, reason: impl Into<String>) {
        self.failures.push(DeletionFailure {
            id,
            reason: reason.into(),
        });
    }

    pub fn succeeded(&self) -> usize {
        self.deleted.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.succeeded() + self.failed()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn principal_deleted(&self) -> bool {
        self.deleted.contains(&self.principal_id)
    }

    /// Human readable progress, e.g. "3 of 5 deleted"
    pub fn summary(&self) -> String {
        format!("{} of {} deleted", self.succeeded(), self.total())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A secondary, or a principal without secondaries, was removed
    Deleted(Uuid),
    /// A principal and its secondaries were processed; may be partial
    CascadeDeleted(CascadeReport),
}
