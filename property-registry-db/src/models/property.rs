use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use crate::cache::{HasPrimaryKey, IdxModelCache};
use crate::models::common_enums::{PropertyPurpose, PropertyStatus};
use crate::models::{Identifiable, Index, IndexAware, Indexable};
use crate::utils::registration_number_hash;

/// Index key holding the parent (principal) of a secondary property
pub const PARENT_PROPERTY_ID_KEY: &str = "parent_property_id";
/// Index key holding the hashed registration number
pub const REGISTRATION_NUMBER_HASH_KEY: &str = "registration_number_hash";

/// # Documentation
/// Database model for a registered property ("imóvel").
///
/// A property without `parent_property_id` is a *principal*. A property whose
/// `parent_property_id` is set is a *secondary*: a parcel subdivided from that
/// principal ("desmembramento"). Only one level of nesting exists, so the
/// referenced parent is itself expected to be a principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyModel {
    pub id: Uuid,

    /// References PropertyModel.id of the principal this parcel belongs to
    pub parent_property_id: Option<Uuid>,

    /// Land registry number ("matrícula")
    pub registration_number: HeaplessString<50>,

    pub description: HeaplessString<255>,
    pub address: Option<HeaplessString<255>>,
    pub locality: Option<HeaplessString<100>>,

    pub purpose: PropertyPurpose,
    pub status: PropertyStatus,

    /// Declared total area in square meters
    pub total_area: Decimal,
    /// Built area in square meters
    pub built_area: Option<Decimal>,

    /// Number of documents linked to this property, maintained by the document service
    pub document_count: i32,

    pub registration_date: DateTime<Utc>,
    pub update_date: Option<DateTime<Utc>>,
}

impl PropertyModel {
    /// A principal has no parent reference
    pub fn is_principal(&self) -> bool {
        self.parent_property_id.is_none()
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_principal()
    }
}

impl Identifiable for PropertyModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Index model for Property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PropertyIdxModel {
    pub id: Uuid,
    pub parent_property_id: Option<Uuid>,
    pub registration_number_hash: i64,
}

impl HasPrimaryKey for PropertyIdxModel {
    fn primary_key(&self) -> Uuid {
        self.id
    }
}

impl IndexAware for PropertyModel {
    type IndexType = PropertyIdxModel;

    fn to_index(&self) -> Self::IndexType {
        // CBOR encoding of a plain string cannot fail
        let registration_number_hash =
            registration_number_hash(self.registration_number.as_str()).unwrap_or_default();

        PropertyIdxModel {
            id: self.id,
            parent_property_id: self.parent_property_id,
            registration_number_hash,
        }
    }
}

impl Identifiable for PropertyIdxModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Index for PropertyIdxModel {}

impl Indexable for PropertyIdxModel {
    fn i64_keys(&self) -> HashMap<String, Option<i64>> {
        let mut keys = HashMap::new();
        keys.insert(
            REGISTRATION_NUMBER_HASH_KEY.to_string(),
            Some(self.registration_number_hash),
        );
        keys
    }

    fn uuid_keys(&self) -> HashMap<String, Option<Uuid>> {
        let mut keys = HashMap::new();
        keys.insert(PARENT_PROPERTY_ID_KEY.to_string(), self.parent_property_id);
        keys
    }
}

pub type PropertyIdxModelCache = IdxModelCache<PropertyIdxModel>;
