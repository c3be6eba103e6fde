//! In-memory property store.
//!
//! Records live in an arena keyed by id; secondaries are found through an
//! [`IdxModelCache`] indexed on `parent_property_id`, never through references
//! between records. Writes apply immediately, so sessions commit trivially and
//! a rollback cannot undo them.
//!
//! The store enforces the same constraints as the PostgreSQL schema: unique
//! ids, existing parent references, and no deletion of a property that is
//! still referenced as a parent.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::IdxModelCache;
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::property::{
    PropertyIdxModel, PropertyModel, PARENT_PROPERTY_ID_KEY, REGISTRATION_NUMBER_HASH_KEY,
};
use crate::models::IndexAware;
use crate::repository::{
    CreateBatch, DeleteBatch, ExistByIds, FindByParentPropertyId, FindByRegistrationNumberHash,
    Load, LoadBatch, LoadPage, Page, PageRequest, PropertyRepository, PropertySession,
    PropertyStore, UpdateBatch,
};

#[derive(Default)]
struct MemoryState {
    properties: HashMap<Uuid, PropertyModel>,
    index: IdxModelCache<PropertyIdxModel>,
}

impl MemoryState {
    fn has_secondaries(&self, id: &Uuid) -> bool {
        !self
            .index
            .get_by_uuid_index(PARENT_PROPERTY_ID_KEY, id)
            .is_empty()
    }
}

#[derive(Default)]
struct FaultPlan {
    unavailable: bool,
    failing_deletes: HashSet<Uuid>,
}

#[derive(Default)]
pub struct InMemoryPropertyRepository {
    state: RwLock<MemoryState>,
    faults: RwLock<FaultPlan>,
    parent_lookups: AtomicUsize,
}

impl InMemoryPropertyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository seeded with `properties`, inserted in order
    pub fn with_properties(properties: Vec<PropertyModel>) -> RepositoryResult<Self> {
        let repo = Self::new();
        {
            let mut state = repo.state.write();
            Self::insert_all(&mut state, properties)?;
        }
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.state.read().properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_available(&self) -> RepositoryResult<()> {
        if self.faults.read().unavailable {
            return Err(RepositoryError::Unavailable(
                "in-memory store is marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn insert_all(
        state: &mut MemoryState,
        items: Vec<PropertyModel>,
    ) -> RepositoryResult<Vec<PropertyModel>> {
        let mut batch_ids = HashSet::new();
        for item in &items {
            if state.properties.contains_key(&item.id) || !batch_ids.insert(item.id) {
                return Err(RepositoryError::Conflict(format!(
                    "property {} already exists",
                    item.id
                )));
            }
        }
        for item in &items {
            Self::check_parent_reference(state, item, &batch_ids)?;
        }

        for item in &items {
            state.index.add(item.to_index());
            state.properties.insert(item.id, item.clone());
        }
        Ok(items)
    }

    fn check_parent_reference(
        state: &MemoryState,
        item: &PropertyModel,
        batch_ids: &HashSet<Uuid>,
    ) -> RepositoryResult<()> {
        match item.parent_property_id {
            Some(parent_id) if parent_id == item.id => Err(RepositoryError::Conflict(format!(
                "property {} cannot reference itself as parent",
                item.id
            ))),
            Some(parent_id)
                if !state.properties.contains_key(&parent_id) && !batch_ids.contains(&parent_id) =>
            {
                Err(RepositoryError::Conflict(format!(
                    "parent property {parent_id} of {} does not exist",
                    item.id
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl InMemoryPropertyRepository {
    /// Makes every operation fail with [`RepositoryError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults.write().unavailable = unavailable;
    }

    /// Makes any delete touching one of `ids` fail with a database error
    pub fn fail_deletes_of(&self, ids: &[Uuid]) {
        self.faults.write().failing_deletes.extend(ids.iter().copied());
    }

    pub fn clear_faults(&self) {
        *self.faults.write() = FaultPlan::default();
    }

    /// Number of lookups served through the parent index so far
    pub fn parent_lookup_count(&self) -> usize {
        self.parent_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Load<PropertyModel> for InMemoryPropertyRepository {
    async fn load(&self, id: Uuid) -> RepositoryResult<PropertyModel> {
        self.ensure_available()?;
        self.state
            .read()
            .properties
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }
}

#[async_trait]
impl LoadBatch<PropertyModel> for InMemoryPropertyRepository {
    async fn load_batch(&self, ids: &[Uuid]) -> RepositoryResult<Vec<Option<PropertyModel>>> {
        self.ensure_available()?;
        let state = self.state.read();
        Ok(ids.iter().map(|id| state.properties.get(id).cloned()).collect())
    }
}

#[async_trait]
impl CreateBatch<PropertyModel> for InMemoryPropertyRepository {
    async fn create_batch(&self, items: Vec<PropertyModel>) -> RepositoryResult<Vec<PropertyModel>> {
        self.ensure_available()?;
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let mut state = self.state.write();
        Self::insert_all(&mut state, items)
    }
}

#[async_trait]
impl UpdateBatch<PropertyModel> for InMemoryPropertyRepository {
    async fn update_batch(&self, items: Vec<PropertyModel>) -> RepositoryResult<Vec<PropertyModel>> {
        self.ensure_available()?;
        let mut state = self.state.write();

        let no_batch_ids = HashSet::new();
        for item in &items {
            if !state.properties.contains_key(&item.id) {
                return Err(RepositoryError::NotFound(item.id));
            }
            Self::check_parent_reference(&state, item, &no_batch_ids)?;
        }

        for item in &items {
            state.index.update(item.to_index());
            state.properties.insert(item.id, item.clone());
        }
        Ok(items)
    }
}

#[async_trait]
impl DeleteBatch for InMemoryPropertyRepository {
    async fn delete_batch(&self, ids: &[Uuid]) -> RepositoryResult<usize> {
        self.ensure_available()?;
        {
            let faults = self.faults.read();
            if let Some(id) = ids.iter().find(|id| faults.failing_deletes.contains(id)) {
                return Err(RepositoryError::Database(format!(
                    "simulated failure deleting property {id}"
                )));
            }
        }

        let mut state = self.state.write();
        let doomed: HashSet<Uuid> = ids.iter().copied().collect();
        for id in &doomed {
            let blocking = state
                .index
                .get_by_uuid_index(PARENT_PROPERTY_ID_KEY, id)
                .into_iter()
                .any(|secondary| !doomed.contains(&secondary.id));
            if blocking {
                return Err(RepositoryError::Conflict(format!(
                    "property {id} is still referenced by secondary properties"
                )));
            }
        }

        let mut deleted_count = 0;
        for id in &doomed {
            if state.properties.remove(id).is_some() {
                state.index.remove(id);
                deleted_count += 1;
            }
        }
        Ok(deleted_count)
    }
}

#[async_trait]
impl ExistByIds for InMemoryPropertyRepository {
    async fn exist_by_ids(&self, ids: &[Uuid]) -> RepositoryResult<Vec<(Uuid, bool)>> {
        self.ensure_available()?;
        let state = self.state.read();
        Ok(ids
            .iter()
            .map(|id| (*id, state.index.contains_primary(id)))
            .collect())
    }
}

#[async_trait]
impl LoadPage<PropertyModel> for InMemoryPropertyRepository {
    async fn load_page(&self, page: PageRequest) -> RepositoryResult<Page<PropertyModel>> {
        self.ensure_available()?;
        let state = self.state.read();
        let mut all: Vec<&PropertyModel> = state.properties.values().collect();
        all.sort_by(|a, b| {
            a.registration_number
                .as_str()
                .cmp(b.registration_number.as_str())
                .then(a.id.cmp(&b.id))
        });
        let items = all
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect();
        Ok(Page::new(items, state.properties.len(), page.limit, page.offset))
    }
}

#[async_trait]
impl FindByParentPropertyId for InMemoryPropertyRepository {
    async fn find_by_parent_property_id(
        &self,
        parent_property_id: Uuid,
    ) -> RepositoryResult<Vec<PropertyIdxModel>> {
        self.ensure_available()?;
        self.parent_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .state
            .read()
            .index
            .get_by_uuid_index(PARENT_PROPERTY_ID_KEY, &parent_property_id))
    }
}

#[async_trait]
impl FindByRegistrationNumberHash for InMemoryPropertyRepository {
    async fn find_by_registration_number_hash(
        &self,
        registration_number_hash: i64,
    ) -> RepositoryResult<Vec<PropertyIdxModel>> {
        self.ensure_available()?;
        Ok(self
            .state
            .read()
            .index
            .get_by_i64_index(REGISTRATION_NUMBER_HASH_KEY, &registration_number_hash))
    }
}

/// [`PropertyStore`] over a shared [`InMemoryPropertyRepository`]
#[derive(Clone, Default)]
pub struct InMemoryPropertyStore {
    repository: Arc<InMemoryPropertyRepository>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_repository(repository: Arc<InMemoryPropertyRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> Arc<InMemoryPropertyRepository> {
        self.repository.clone()
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn PropertySession>> {
        self.repository.ensure_available()?;
        Ok(Box::new(InMemorySession {
            repository: self.repository.clone(),
        }))
    }
}

struct InMemorySession {
    repository: Arc<InMemoryPropertyRepository>,
}

#[async_trait]
impl PropertySession for InMemorySession {
    fn properties(&self) -> &dyn PropertyRepository {
        self.repository.as_ref()
    }

    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepositoryResult<()> {
        tracing::debug!("in-memory session rolled back; writes were already applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PropertyPurpose, PropertyStatus};
    use crate::utils::registration_number_hash;
    use chrono::Utc;
    use heapless::String as HeaplessString;
    use rust_decimal::Decimal;

    fn property(registration_number: &str, parent_property_id: Option<Uuid>) -> PropertyModel {
        PropertyModel {
            id: Uuid::new_v4(),
            parent_property_id,
            registration_number: HeaplessString::try_from(registration_number).unwrap(),
            description: HeaplessString::try_from("Gleba").unwrap(),
            address: None,
            locality: None,
            purpose: PropertyPurpose::Rural,
            status: PropertyStatus::Active,
            total_area: Decimal::from(1000),
            built_area: None,
            document_count: 0,
            registration_date: Utc::now(),
            update_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_parent() {
        let repo = InMemoryPropertyRepository::new();
        let principal = property("MAT-1", None);
        let first = property("MAT-2", Some(principal.id));
        let second = property("MAT-3", Some(principal.id));

        repo.create_batch(vec![principal.clone(), first.clone(), second.clone()])
            .await
            .unwrap();

        let found = repo.find_by_parent_property_id(principal.id).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|idx| idx.id == first.id));
        assert!(found.iter().any(|idx| idx.id == second.id));
        assert!(repo
            .find_by_parent_property_id(first.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(repo.parent_lookup_count(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_parent_and_duplicates() {
        let repo = InMemoryPropertyRepository::new();
        let orphan = property("MAT-9", Some(Uuid::new_v4()));
        let result = repo.create_batch(vec![orphan]).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        let principal = property("MAT-1", None);
        repo.create_batch(vec![principal.clone()]).await.unwrap();
        let result = repo.create_batch(vec![principal]).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_refuses_referenced_principal() {
        let principal = property("MAT-1", None);
        let secondary = property("MAT-2", Some(principal.id));
        let repo =
            InMemoryPropertyRepository::with_properties(vec![principal.clone(), secondary.clone()])
                .unwrap();

        let result = repo.delete_batch(&[principal.id]).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));

        assert_eq!(repo.delete_batch(&[secondary.id]).await.unwrap(), 1);
        assert_eq!(repo.delete_batch(&[principal.id]).await.unwrap(), 1);
        assert_eq!(repo.delete_batch(&[principal.id]).await.unwrap(), 0);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_update_moves_secondary_in_parent_index() {
        let principal_a = property("MAT-1", None);
        let principal_b = property("MAT-2", None);
        let mut secondary = property("MAT-3", Some(principal_a.id));
        let repo = InMemoryPropertyRepository::with_properties(vec![
            principal_a.clone(),
            principal_b.clone(),
            secondary.clone(),
        ])
        .unwrap();

        secondary.parent_property_id = Some(principal_b.id);
        repo.update_batch(vec![secondary.clone()]).await.unwrap();

        assert!(repo
            .find_by_parent_property_id(principal_a.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            repo.find_by_parent_property_id(principal_b.id)
                .await
                .unwrap()
                .len(),
            1
        );

        let unknown = property("MAT-4", None);
        let result = repo.update_batch(vec![unknown.clone()]).await;
        assert_eq!(result, Err(RepositoryError::NotFound(unknown.id)));
    }

    #[tokio::test]
    async fn test_load_page_orders_by_registration_number() {
        let repo = InMemoryPropertyRepository::with_properties(vec![
            property("MAT-3", None),
            property("MAT-1", None),
            property("MAT-2", None),
        ])
        .unwrap();

        let page = repo.load_page(PageRequest::new(2, 0)).await.unwrap();
        assert_eq!(page.total, 3);
        let numbers: Vec<&str> = page
            .items
            .iter()
            .map(|p| p.registration_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["MAT-1", "MAT-2"]);
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn test_find_by_registration_number_hash() {
        let principal = property("MAT-77", None);
        let repo = InMemoryPropertyRepository::with_properties(vec![principal.clone()]).unwrap();

        let hash = registration_number_hash("mat-77").unwrap();
        let found = repo.find_by_registration_number_hash(hash).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, principal.id);
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let principal = property("MAT-1", None);
        let store = InMemoryPropertyStore::from_repository(Arc::new(
            InMemoryPropertyRepository::with_properties(vec![principal.clone()]).unwrap(),
        ));
        let repo = store.repository();

        repo.fail_deletes_of(&[principal.id]);
        let result = repo.delete_batch(&[principal.id]).await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));

        repo.set_unavailable(true);
        match store.begin().await {
            Err(e) => assert!(e.is_unavailable()),
            Ok(_) => panic!("begin should fail while the backend is unavailable"),
        }
        assert!(repo.load(principal.id).await.unwrap_err().is_unavailable());

        repo.clear_faults();
        let session = store.begin().await.unwrap();
        assert_eq!(session.properties().delete_batch(&[principal.id]).await, Ok(1));
        session.commit().await.unwrap();
    }
}
