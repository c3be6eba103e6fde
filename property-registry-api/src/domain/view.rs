use property_registry_db::PropertyModel;
use serde::{Deserialize, Serialize};

use crate::domain::AreaReconciliation;

/// A property as presented by the hierarchy views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: PropertyModel,
    pub is_principal: bool,
    /// Number of direct secondaries; always 0 for a secondary
    pub secondary_count: usize,
    /// Present for principals only
    pub reconciliation: Option<AreaReconciliation>,
}
