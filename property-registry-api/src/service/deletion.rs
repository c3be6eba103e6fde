use property_registry_db::repository::{DeleteBatch, PropertyRepository, PropertyStore};
use property_registry_db::PropertyModel;
use uuid::Uuid;

use crate::domain::{CascadeReport, DeleteOutcome, DeleteRequest, DependentSecondary};
use crate::error::{ApiError, ApiResult};
use crate::service::hierarchy::HierarchyResolver;
use crate::service::rollback_quietly;

enum DeletePlan {
    Single(Uuid),
    Blocked(Vec<DependentSecondary>),
    Cascade {
        principal_id: Uuid,
        secondaries: Vec<Uuid>,
    },
}

/// Gatekeeper for property deletion.
///
/// A secondary, or a principal without secondaries, is deleted directly. A
/// principal with secondaries is refused with [`ApiError::HasDependents`]
/// unless the request asks for a cascade. A cascade removes the secondaries
/// one at a time, each in its own session, and removes the principal last and
/// only if every secondary is gone. Completed removals are kept when a later
/// one fails; the [`CascadeReport`] tells which.
pub struct CascadeDeletionGuard<'a> {
    store: &'a dyn PropertyStore,
}

impl<'a> CascadeDeletionGuard<'a> {
    pub fn new(store: &'a dyn PropertyStore) -> Self {
        Self { store }
    }

    pub async fn delete(&self, request: DeleteRequest) -> ApiResult<DeleteOutcome> {
        let session = self.store.begin().await?;
        let plan = match plan(session.properties(), request).await {
            Ok(plan) => plan,
            Err(e) => {
                rollback_quietly(session).await;
                return Err(e);
            }
        };

        match plan {
            DeletePlan::Single(id) => {
                let deleted = match session.properties().delete_batch(&[id]).await {
                    Ok(deleted) => deleted,
                    Err(e) => {
                        rollback_quietly(session).await;
                        return Err(e.into());
                    }
                };
                session.commit().await?;
                if deleted == 0 {
                    return Err(ApiError::NotFound(id));
                }
                tracing::debug!(property_id = %id, "property deleted");
                Ok(DeleteOutcome::Deleted(id))
            }
            DeletePlan::Blocked(dependents) => {
                rollback_quietly(session).await;
                tracing::info!(
                    property_id = %request.property_id,
                    dependents = dependents.len(),
                    "delete blocked by secondary properties"
                );
                Err(ApiError::HasDependents {
                    property_id: request.property_id,
                    dependents,
                })
            }
            DeletePlan::Cascade {
                principal_id,
                secondaries,
            } => {
                rollback_quietly(session).await;
                Ok(DeleteOutcome::CascadeDeleted(
                    self.cascade(principal_id, &secondaries).await,
                ))
            }
        }
    }

    async fn cascade(&self, principal_id: Uuid, secondaries: &[Uuid]) -> CascadeReport {
        let mut report = CascadeReport::new(principal_id);

        for id in secondaries {
            match self.delete_in_own_session(*id).await {
                Ok(_) => report.record_deleted(*id),
                Err(e) => {
                    tracing::error!(property_id = %id, error = %e, "failed to delete secondary property");
                    report.record_failure(*id, e.to_string());
                }
            }
        }

        if report.is_complete() {
            match self.delete_in_own_session(principal_id).await {
                Ok(_) => report.record_deleted(principal_id),
                Err(e) => {
                    tracing::error!(property_id = %principal_id, error = %e, "failed to delete principal property");
                    report.record_failure(principal_id, e.to_string());
                }
            }
        } else {
            let remaining = report.failed();
            report.record_failure(
                principal_id,
                format!("not deleted: {remaining} secondary properties could not be removed"),
            );
        }

        if report.is_complete() {
            tracing::info!(property_id = %principal_id, deleted = report.succeeded(), "cascade delete completed");
        } else {
            tracing::warn!(
                property_id = %principal_id,
                succeeded = report.succeeded(),
                total = report.total(),
                "cascade delete partially completed"
            );
        }
        report
    }

    async fn delete_in_own_session(&self, id: Uuid) -> ApiResult<usize> {
        let session = self.store.begin().await?;
        match session.properties().delete_batch(&[id]).await {
            Ok(deleted) => {
                session.commit().await?;
                Ok(deleted)
            }
            Err(e) => {
                rollback_quietly(session).await;
                Err(e.into())
            }
        }
    }
}

async fn plan(repo: &dyn PropertyRepository, request: DeleteRequest) -> ApiResult<DeletePlan> {
    let resolver = HierarchyResolver::new(repo);
    let target = resolver.load(request.property_id).await?;

    if !target.is_principal() {
        return Ok(DeletePlan::Single(target.id));
    }

    let secondaries = resolver.secondaries_of(&target).await?;
    if secondaries.is_empty() {
        return Ok(DeletePlan::Single(target.id));
    }

    if !request.cascade {
        return Ok(DeletePlan::Blocked(
            secondaries.iter().map(DependentSecondary::from).collect(),
        ));
    }

    Ok(DeletePlan::Cascade {
        principal_id: target.id,
        secondaries: secondaries.iter().map(|s: &PropertyModel| s.id).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{family, store_with};
    use property_registry_db::repository::{ExistByIds, FindByParentPropertyId, Load};

    fn seeded(principal_area: i64, areas: &[i64]) -> (PropertyModel, Vec<PropertyModel>, Vec<PropertyModel>) {
        let (principal, secondaries) = family(principal_area, areas);
        let mut all = vec![principal.clone()];
        all.extend(secondaries.clone());
        (principal, secondaries, all)
    }

    #[tokio::test]
    async fn test_blocked_delete_lists_dependents_and_leaves_storage_untouched() {
        let (principal, secondaries, all) = seeded(1000, &[300, 400]);
        let store = store_with(all.clone());
        let repo = store.repository();
        let guard = CascadeDeletionGuard::new(&store);

        let error = guard
            .delete(DeleteRequest::single(principal.id))
            .await
            .unwrap_err();

        match error {
            ApiError::HasDependents {
                property_id,
                dependents,
            } => {
                assert_eq!(property_id, principal.id);
                let expected: Vec<DependentSecondary> =
                    secondaries.iter().map(DependentSecondary::from).collect();
                assert_eq!(dependents, expected);
            }
            other => panic!("expected HasDependents, got {other:?}"),
        }

        for property in &all {
            assert_eq!(repo.load(property.id).await.unwrap(), *property);
        }
    }

    #[tokio::test]
    async fn test_blocked_delete_can_be_retried_with_cascade() {
        let (principal, secondaries, all) = seeded(1000, &[300, 400]);
        let store = store_with(all);
        let repo = store.repository();
        let guard = CascadeDeletionGuard::new(&store);

        assert!(guard.delete(DeleteRequest::single(principal.id)).await.is_err());
        let outcome = guard
            .delete(DeleteRequest::cascading(principal.id))
            .await
            .unwrap();

        let DeleteOutcome::CascadeDeleted(report) = outcome else {
            panic!("expected a cascade");
        };
        assert!(report.is_complete());
        assert!(report.principal_deleted());
        assert_eq!(report.summary(), "3 of 3 deleted");

        assert!(repo
            .find_by_parent_property_id(principal.id)
            .await
            .unwrap()
            .is_empty());
        assert!(HierarchyResolver::new(repo.as_ref())
            .list_secondaries(principal.id)
            .await
            .is_err());
        for id in std::iter::once(principal.id).chain(secondaries.iter().map(|s| s.id)) {
            assert_eq!(
                HierarchyResolver::new(repo.as_ref()).load(id).await,
                Err(ApiError::NotFound(id))
            );
        }
    }

    #[tokio::test]
    async fn test_deleting_secondary_needs_no_cascade_and_skips_dependent_lookup() {
        let (principal, secondaries, all) = seeded(1000, &[300, 400]);
        let store = store_with(all);
        let repo = store.repository();
        let guard = CascadeDeletionGuard::new(&store);

        let outcome = guard
            .delete(DeleteRequest::single(secondaries[0].id))
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted(secondaries[0].id));
        assert_eq!(repo.parent_lookup_count(), 0);

        let exists = repo
            .exist_by_ids(&[principal.id, secondaries[0].id, secondaries[1].id])
            .await
            .unwrap();
        assert_eq!(
            exists,
            vec![
                (principal.id, true),
                (secondaries[0].id, false),
                (secondaries[1].id, true)
            ]
        );
    }

    #[tokio::test]
    async fn test_principal_without_secondaries_is_deleted_directly() {
        let (principal, _, all) = seeded(1000, &[]);
        let store = store_with(all);
        let guard = CascadeDeletionGuard::new(&store);

        let outcome = guard
            .delete(DeleteRequest::cascading(principal.id))
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted(principal.id));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = store_with(Vec::new());
        let guard = CascadeDeletionGuard::new(&store);
        let missing = Uuid::new_v4();

        assert_eq!(
            guard.delete(DeleteRequest::single(missing)).await,
            Err(ApiError::NotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_partial_cascade_keeps_completed_deletions_and_principal() {
        let (principal, secondaries, all) = seeded(1000, &[100, 200, 300, 400]);
        let store = store_with(all);
        let repo = store.repository();
        repo.fail_deletes_of(&[secondaries[2].id]);
        let guard = CascadeDeletionGuard::new(&store);

        let DeleteOutcome::CascadeDeleted(report) = guard
            .delete(DeleteRequest::cascading(principal.id))
            .await
            .unwrap()
        else {
            panic!("expected a cascade");
        };

        assert!(!report.is_complete());
        assert_eq!(report.summary(), "3 of 5 deleted");
        assert!(!report.principal_deleted());
        let failed: Vec<Uuid> = report.failures.iter().map(|f| f.id).collect();
        assert_eq!(failed, vec![secondaries[2].id, principal.id]);

        assert!(repo.load(principal.id).await.is_ok());
        assert!(repo.load(secondaries[2].id).await.is_ok());
        assert!(repo.load(secondaries[0].id).await.is_err());
    }

    #[tokio::test]
    async fn test_backend_down_before_delete_fails_entirely() {
        let (principal, _, all) = seeded(1000, &[300]);
        let store = store_with(all.clone());
        let repo = store.repository();
        repo.set_unavailable(true);
        let guard = CascadeDeletionGuard::new(&store);

        let error = guard
            .delete(DeleteRequest::cascading(principal.id))
            .await
            .unwrap_err();
        assert!(error.is_backend_unavailable());

        repo.clear_faults();
        assert_eq!(repo.len(), all.len());
    }
}
