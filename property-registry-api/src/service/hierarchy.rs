use property_registry_db::repository::{
    FindByParentPropertyId, Load, LoadBatch, PropertyRepository,
};
use property_registry_db::PropertyModel;
use uuid::Uuid;

use crate::domain::PropertyView;
use crate::error::ApiResult;
use crate::service::reconciliation::reconcile;

/// Read-only navigation of the principal/secondary hierarchy.
///
/// Secondaries are found through the parent index and then loaded by id.
pub struct HierarchyResolver<'a> {
    repo: &'a dyn PropertyRepository,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(repo: &'a dyn PropertyRepository) -> Self {
        Self { repo }
    }

    pub async fn load(&self, id: Uuid) -> ApiResult<PropertyModel> {
        Ok(self.repo.load(id).await?)
    }

    /// Secondaries of `principal_id`, ordered by registration number.
    ///
    /// Empty when the target is itself a secondary or has no secondaries.
    /// Fails with `NotFound` when `principal_id` does not exist.
    pub async fn list_secondaries(&self, principal_id: Uuid) -> ApiResult<Vec<PropertyModel>> {
        let target = self.load(principal_id).await?;
        self.secondaries_of(&target).await
    }

    /// Secondaries of an already loaded property
    pub async fn secondaries_of(&self, property: &PropertyModel) -> ApiResult<Vec<PropertyModel>> {
        if !property.is_principal() {
            return Ok(Vec::new());
        }

        let index_entries = self.repo.find_by_parent_property_id(property.id).await?;
        if index_entries.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = index_entries.iter().map(|idx| idx.id).collect();
        // An entry can vanish between the index lookup and the load
        let mut secondaries: Vec<PropertyModel> = self
            .repo
            .load_batch(&ids)
            .await?
            .into_iter()
            .flatten()
            .collect();
        secondaries.sort_by(|a, b| {
            a.registration_number
                .as_str()
                .cmp(b.registration_number.as_str())
                .then(a.id.cmp(&b.id))
        });
        Ok(secondaries)
    }

    /// The property with its hierarchy figures; reconciliation for principals only
    pub async fn view(&self, id: Uuid) -> ApiResult<PropertyView> {
        let property = self.load(id).await?;
        let secondaries = self.secondaries_of(&property).await?;
        let reconciliation = reconcile(&property, &secondaries)?;

        Ok(PropertyView {
            is_principal: property.is_principal(),
            secondary_count: secondaries.len(),
            reconciliation,
            property,
        })
    }
}
