//! In-process index cache.
//!
//! `IdxModelCache` keeps every index record of one table in memory, keyed by
//! primary id, with secondary lookups on the i64 and uuid keys each record
//! exposes through [`Indexable`]. `TransactionAwareIdxModelCache` layers the
//! changes of one unit of work over a shared cache and publishes them only on
//! commit.

use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{RepositoryError, RepositoryResult};
use crate::models::Indexable;

/// Records with a UUID primary key
pub trait HasPrimaryKey {
    fn primary_key(&self) -> Uuid;
}

#[derive(Debug, Clone)]
pub struct IdxModelCache<T: Indexable + Clone> {
    by_primary: HashMap<Uuid, T>,
    i64_indices: HashMap<String, HashMap<i64, BTreeSet<Uuid>>>,
    uuid_indices: HashMap<String, HashMap<Uuid, BTreeSet<Uuid>>>,
}

impl<T: Indexable + Clone> IdxModelCache<T> {
    /// Builds a cache from an initial set of index records
    ///
    /// Fails when two records share a primary key.
    pub fn new(items: Vec<T>) -> RepositoryResult<Self> {
        let mut cache = Self {
            by_primary: HashMap::with_capacity(items.len()),
            i64_indices: HashMap::new(),
            uuid_indices: HashMap::new(),
        };
        for item in items {
            let id = item.primary_key();
            if cache.by_primary.contains_key(&id) {
                return Err(RepositoryError::Conflict(format!(
                    "duplicate primary key {id} in index cache"
                )));
            }
            cache.add(item);
        }
        Ok(cache)
    }

    /// Inserts a record, replacing any record with the same primary key
    pub fn add(&mut self, item: T) {
        let id = item.primary_key();
        self.remove(&id);

        for (key, value) in item.i64_keys() {
            if let Some(value) = value {
                self.i64_indices
                    .entry(key)
                    .or_default()
                    .entry(value)
                    .or_default()
                    .insert(id);
            }
        }
        for (key, value) in item.uuid_keys() {
            if let Some(value) = value {
                self.uuid_indices
                    .entry(key)
                    .or_default()
                    .entry(value)
                    .or_default()
                    .insert(id);
            }
        }
        self.by_primary.insert(id, item);
    }

    pub fn update(&mut self, item: T) {
        self.add(item);
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<T> {
        let item = self.by_primary.remove(id)?;

        for (key, value) in item.i64_keys() {
            if let (Some(value), Some(index)) = (value, self.i64_indices.get_mut(&key)) {
                if let Some(ids) = index.get_mut(&value) {
                    ids.remove(id);
                    if ids.is_empty() {
                        index.remove(&value);
                    }
                }
            }
        }
        for (key, value) in item.uuid_keys() {
            if let (Some(value), Some(index)) = (value, self.uuid_indices.get_mut(&key)) {
                if let Some(ids) = index.get_mut(&value) {
                    ids.remove(id);
                    if ids.is_empty() {
                        index.remove(&value);
                    }
                }
            }
        }
        Some(item)
    }

    pub fn contains_primary(&self, id: &Uuid) -> bool {
        self.by_primary.contains_key(id)
    }

    pub fn get_by_primary(&self, id: &Uuid) -> Option<T> {
        self.by_primary.get(id).cloned()
    }

    /// Records whose i64 key `key` equals `value`, ordered by primary key
    pub fn get_by_i64_index(&self, key: &str, value: &i64) -> Vec<T> {
        self.i64_indices
            .get(key)
            .and_then(|index| index.get(value))
            .map(|ids| self.collect(ids))
            .unwrap_or_default()
    }

    /// Records whose uuid key `key` equals `value`, ordered by primary key
    pub fn get_by_uuid_index(&self, key: &str, value: &Uuid) -> Vec<T> {
        self.uuid_indices
            .get(key)
            .and_then(|index| index.get(value))
            .map(|ids| self.collect(ids))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_primary.is_empty()
    }

    fn collect(&self, ids: &BTreeSet<Uuid>) -> Vec<T> {
        ids.iter()
            .filter_map(|id| self.by_primary.get(id).cloned())
            .collect()
    }
}

impl<T: Indexable + Clone> Default for IdxModelCache<T> {
    fn default() -> Self {
        Self {
            by_primary: HashMap::new(),
            i64_indices: HashMap::new(),
            uuid_indices: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum PendingChange<T> {
    Upsert(T),
    Remove(Uuid),
}

/// Per unit-of-work view over a shared [`IdxModelCache`]
///
/// Changes are staged locally and become visible to other sessions only after
/// [`on_commit`](Self::on_commit). Reads through this wrapper see the shared
/// state with the staged changes applied on top.
pub struct TransactionAwareIdxModelCache<T: Indexable + Clone> {
    shared: Arc<RwLock<IdxModelCache<T>>>,
    pending: Mutex<Vec<PendingChange<T>>>,
}

impl<T: Indexable + Clone> TransactionAwareIdxModelCache<T> {
    pub fn new(shared: Arc<RwLock<IdxModelCache<T>>>) -> Self {
        Self {
            shared,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, item: T) {
        self.pending.lock().push(PendingChange::Upsert(item));
    }

    pub fn update(&self, item: T) {
        self.add(item);
    }

    pub fn remove(&self, id: &Uuid) {
        self.pending.lock().push(PendingChange::Remove(*id));
    }

    pub fn contains_primary(&self, id: &Uuid) -> bool {
        match self.staged().get(id) {
            Some(staged) => staged.is_some(),
            None => self.shared.read().contains_primary(id),
        }
    }

    pub fn get_by_primary(&self, id: &Uuid) -> Option<T> {
        match self.staged().remove(id) {
            Some(staged) => staged,
            None => self.shared.read().get_by_primary(id),
        }
    }

    pub fn get_by_i64_index(&self, key: &str, value: &i64) -> Vec<T> {
        let committed = self.shared.read().get_by_i64_index(key, value);
        self.overlay(committed, |item| {
            item.i64_keys().get(key).copied().flatten() == Some(*value)
        })
    }

    pub fn get_by_uuid_index(&self, key: &str, value: &Uuid) -> Vec<T> {
        let committed = self.shared.read().get_by_uuid_index(key, value);
        self.overlay(committed, |item| {
            item.uuid_keys().get(key).copied().flatten() == Some(*value)
        })
    }

    /// Publishes the staged changes to the shared cache
    pub fn on_commit(&self) {
        let changes: Vec<_> = self.pending.lock().drain(..).collect();
        if changes.is_empty() {
            return;
        }
        let mut shared = self.shared.write();
        for change in changes {
            match change {
                PendingChange::Upsert(item) => shared.add(item),
                PendingChange::Remove(id) => {
                    shared.remove(&id);
                }
            }
        }
    }

    /// Discards the staged changes
    pub fn on_rollback(&self) {
        self.pending.lock().clear();
    }

    /// Latest staged state per primary key; `None` marks a staged removal
    fn staged(&self) -> HashMap<Uuid, Option<T>> {
        let mut view = HashMap::new();
        for change in self.pending.lock().iter() {
            match change {
                PendingChange::Upsert(item) => {
                    view.insert(item.primary_key(), Some(item.clone()));
                }
                PendingChange::Remove(id) => {
                    view.insert(*id, None);
                }
            }
        }
        view
    }

    fn overlay(&self, committed: Vec<T>, matches: impl Fn(&T) -> bool) -> Vec<T> {
        let staged = self.staged();
        let mut result: Vec<T> = committed
            .into_iter()
            .filter(|item| !staged.contains_key(&item.primary_key()))
            .collect();
        result.extend(staged.into_values().flatten().filter(|item| matches(item)));
        result.sort_by_key(|item| item.primary_key());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyIdxModel;
    use crate::models::{PARENT_PROPERTY_ID_KEY, REGISTRATION_NUMBER_HASH_KEY};

    fn idx(parent_property_id: Option<Uuid>, registration_number_hash: i64) -> PropertyIdxModel {
        PropertyIdxModel {
            id: Uuid::new_v4(),
            parent_property_id,
            registration_number_hash,
        }
    }

    #[test]
    fn test_new_rejects_duplicate_primary_keys() {
        let item = idx(None, 1);
        let result = IdxModelCache::new(vec![item.clone(), item]);
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[test]
    fn test_uuid_index_lookup_and_removal() {
        let principal = idx(None, 1);
        let first = idx(Some(principal.id), 2);
        let second = idx(Some(principal.id), 3);
        let mut cache =
            IdxModelCache::new(vec![principal.clone(), first.clone(), second.clone()]).unwrap();

        let found = cache.get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &principal.id);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&first));
        assert!(found.contains(&second));

        cache.remove(&first.id);
        let found = cache.get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &principal.id);
        assert_eq!(found, vec![second]);
        assert!(!cache.contains_primary(&first.id));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_update_moves_record_between_index_entries() {
        let principal_a = idx(None, 1);
        let principal_b = idx(None, 2);
        let mut secondary = idx(Some(principal_a.id), 3);
        let mut cache = IdxModelCache::new(vec![
            principal_a.clone(),
            principal_b.clone(),
            secondary.clone(),
        ])
        .unwrap();

        secondary.parent_property_id = Some(principal_b.id);
        cache.update(secondary.clone());

        assert!(cache
            .get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &principal_a.id)
            .is_empty());
        assert_eq!(
            cache.get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &principal_b.id),
            vec![secondary]
        );
    }

    #[test]
    fn test_i64_index_lookup() {
        let item = idx(None, 42);
        let cache = IdxModelCache::new(vec![item.clone(), idx(None, 7)]).unwrap();

        assert_eq!(
            cache.get_by_i64_index(REGISTRATION_NUMBER_HASH_KEY, &42),
            vec![item]
        );
        assert!(cache
            .get_by_i64_index(REGISTRATION_NUMBER_HASH_KEY, &99)
            .is_empty());
    }

    #[test]
    fn test_transaction_aware_cache_publishes_on_commit() {
        let principal = idx(None, 1);
        let shared = Arc::new(RwLock::new(IdxModelCache::new(vec![principal.clone()]).unwrap()));
        let session = TransactionAwareIdxModelCache::new(shared.clone());

        let secondary = idx(Some(principal.id), 2);
        session.add(secondary.clone());

        assert!(session.contains_primary(&secondary.id));
        assert_eq!(
            session.get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &principal.id),
            vec![secondary.clone()]
        );
        assert!(!shared.read().contains_primary(&secondary.id));

        session.on_commit();
        assert!(shared.read().contains_primary(&secondary.id));
    }

    #[test]
    fn test_transaction_aware_cache_discards_on_rollback() {
        let principal = idx(None, 1);
        let secondary = idx(Some(principal.id), 2);
        let shared = Arc::new(RwLock::new(
            IdxModelCache::new(vec![principal.clone(), secondary.clone()]).unwrap(),
        ));
        let session = TransactionAwareIdxModelCache::new(shared.clone());

        session.remove(&secondary.id);
        assert!(!session.contains_primary(&secondary.id));
        assert!(session
            .get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &principal.id)
            .is_empty());

        session.on_rollback();
        assert!(session.contains_primary(&secondary.id));
        assert_eq!(
            shared
                .read()
                .get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &principal.id),
            vec![secondary]
        );
    }
}
