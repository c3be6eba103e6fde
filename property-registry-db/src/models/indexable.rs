use std::collections::HashMap;
use uuid::Uuid;

use crate::cache::HasPrimaryKey;

/// Trait for index records that expose secondary lookup keys to the index cache
///
/// Each key name maps to the value stored under it. A `None` value means the
/// record is not reachable through that key (e.g. a principal property has no
/// `parent_property_id`).
pub trait Indexable: HasPrimaryKey {
    fn i64_keys(&self) -> HashMap<String, Option<i64>>;

    fn uuid_keys(&self) -> HashMap<String, Option<Uuid>>;
}
