use chrono::Utc;
use property_registry_db::repository::{
    CreateBatch, FindByRegistrationNumberHash, Load, LoadBatch, PropertyRepository, PropertyStore,
};
use property_registry_db::utils::registration_number_hash;
use property_registry_db::{PropertyModel, RepositoryError};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::ingest::PropertyDraft;
use crate::service::rollback_quietly;

/// Creates and updates property records.
///
/// Enforces the single-level hierarchy: a parent must exist and be a
/// principal, a property cannot be its own parent, and a principal that still
/// has secondaries cannot become a secondary. Registration numbers are unique
/// ignoring case and surrounding whitespace.
pub struct PropertyRegistrar<'a> {
    store: &'a dyn PropertyStore,
}

impl<'a> PropertyRegistrar<'a> {
    pub fn new(store: &'a dyn PropertyStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, draft: PropertyDraft) -> ApiResult<PropertyModel> {
        let session = self.store.begin().await?;
        match create_in(session.properties(), draft).await {
            Ok(created) => {
                session.commit().await?;
                tracing::info!(property_id = %created.id, principal = created.is_principal(), "property registered");
                Ok(created)
            }
            Err(e) => {
                rollback_quietly(session).await;
                Err(e)
            }
        }
    }

    /// Replaces the mutable fields of `id` with `draft`
    pub async fn update(&self, id: Uuid, draft: PropertyDraft) -> ApiResult<PropertyModel> {
        let session = self.store.begin().await?;
        match update_in(session.properties(), id, draft).await {
            Ok(updated) => {
                session.commit().await?;
                tracing::info!(property_id = %updated.id, "property updated");
                Ok(updated)
            }
            Err(e) => {
                rollback_quietly(session).await;
                Err(e)
            }
        }
    }
}

async fn create_in(repo: &dyn PropertyRepository, draft: PropertyDraft) -> ApiResult<PropertyModel> {
    let id = Uuid::new_v4();
    validate_parent(repo, id, draft.parent_property_id).await?;
    ensure_unique_registration_number(repo, id, draft.registration_number.as_str()).await?;

    let property = PropertyModel {
        id,
        parent_property_id: draft.parent_property_id,
        registration_number: draft.registration_number,
        description: draft.description,
        address: draft.address,
        locality: draft.locality,
        purpose: draft.purpose,
        status: draft.status,
        total_area: draft.total_area,
        built_area: draft.built_area,
        document_count: 0,
        registration_date: Utc::now(),
        update_date: None,
    };

    let mut created = repo.create_batch(vec![property]).await?;
    created
        .pop()
        .ok_or_else(|| ApiError::Internal("create returned no property".to_string()))
}

async fn update_in(
    repo: &dyn PropertyRepository,
    id: Uuid,
    draft: PropertyDraft,
) -> ApiResult<PropertyModel> {
    let existing = repo.load(id).await?;
    validate_parent(repo, id, draft.parent_property_id).await?;

    if existing.is_principal() && draft.parent_property_id.is_some() {
        let secondaries = repo.find_by_parent_property_id(id).await?;
        if !secondaries.is_empty() {
            return Err(ApiError::Validation(format!(
                "property {id} has {} secondary properties and cannot become a secondary",
                secondaries.len()
            )));
        }
    }

    ensure_unique_registration_number(repo, id, draft.registration_number.as_str()).await?;

    let property = PropertyModel {
        id,
        parent_property_id: draft.parent_property_id,
        registration_number: draft.registration_number,
        description: draft.description,
        address: draft.address,
        locality: draft.locality,
        purpose: draft.purpose,
        status: draft.status,
        total_area: draft.total_area,
        built_area: draft.built_area,
        document_count: existing.document_count,
        registration_date: existing.registration_date,
        update_date: Some(Utc::now()),
    };

    let mut updated = repo.update_batch(vec![property]).await?;
    updated
        .pop()
        .ok_or_else(|| ApiError::Internal("update returned no property".to_string()))
}

async fn validate_parent(
    repo: &dyn PropertyRepository,
    id: Uuid,
    parent_property_id: Option<Uuid>,
) -> ApiResult<()> {
    let Some(parent_id) = parent_property_id else {
        return Ok(());
    };

    if parent_id == id {
        return Err(ApiError::Validation(
            "a property cannot be its own parent".to_string(),
        ));
    }

    let parent = match repo.load(parent_id).await {
        Ok(parent) => parent,
        Err(RepositoryError::NotFound(_)) => {
            return Err(ApiError::Validation(format!(
                "parent property {parent_id} does not exist"
            )))
        }
        Err(e) => return Err(e.into()),
    };

    if !parent.is_principal() {
        return Err(ApiError::Validation(format!(
            "parent property {parent_id} is itself a secondary property"
        )));
    }
    Ok(())
}

async fn ensure_unique_registration_number(
    repo: &dyn PropertyRepository,
    id: Uuid,
    registration_number: &str,
) -> ApiResult<()> {
    let hash = registration_number_hash(registration_number).map_err(ApiError::Internal)?;
    let candidates: Vec<Uuid> = repo
        .find_by_registration_number_hash(hash)
        .await?
        .into_iter()
        .map(|idx| idx.id)
        .filter(|candidate| *candidate != id)
        .collect();
    if candidates.is_empty() {
        return Ok(());
    }

    let wanted = registration_number.trim().to_uppercase();
    let taken = repo
        .load_batch(&candidates)
        .await?
        .into_iter()
        .flatten()
        .any(|other| other.registration_number.trim().to_uppercase() == wanted);

    if taken {
        return Err(ApiError::Conflict(format!(
            "registration number {registration_number} is already in use"
        )));
    }
    Ok(())
}
