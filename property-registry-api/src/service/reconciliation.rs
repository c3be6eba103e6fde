use property_registry_db::PropertyModel;
use rust_decimal::Decimal;

use crate::domain::AreaReconciliation;
use crate::error::{ApiError, ApiResult};

/// Derives the area figures of `principal` from its direct secondaries.
///
/// Returns `None` for a secondary. Records in `secondaries` that do not point
/// at `principal` are ignored, and the sum is not recursive. A principal with
/// zero area reports 0%. Areas too large for `Decimal` arithmetic fail with
/// `ApiError::Internal` instead of panicking.
pub fn reconcile(
    principal: &PropertyModel,
    secondaries: &[PropertyModel],
) -> ApiResult<Option<AreaReconciliation>> {
    if !principal.is_principal() {
        return Ok(None);
    }

    let secondary_area_total = secondaries
        .iter()
        .filter(|secondary| secondary.parent_property_id == Some(principal.id))
        .try_fold(Decimal::ZERO, |total, secondary| {
            total.checked_add(secondary.total_area)
        })
        .ok_or_else(|| overflow(principal, "secondary area total"))?;

    let remaining_area = principal
        .total_area
        .checked_sub(secondary_area_total)
        .ok_or_else(|| overflow(principal, "remaining area"))?
        .max(Decimal::ZERO);

    let consumed_percentage = if principal.total_area.is_zero() {
        Decimal::ZERO
    } else {
        secondary_area_total
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(principal.total_area))
            .ok_or_else(|| overflow(principal, "consumed percentage"))?
    };

    Ok(Some(AreaReconciliation {
        secondary_area_total,
        remaining_area,
        consumed_percentage,
        has_area_inconsistency: secondary_area_total > principal.total_area,
    }))
}

fn overflow(principal: &PropertyModel, figure: &str) -> ApiError {
    tracing::error!(property_id = %principal.id, figure, "area reconciliation overflowed");
    ApiError::Internal(format!(
        "{figure} of property {} is out of range",
        principal.id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{family, property};
    use std::str::FromStr;

    #[test]
    fn test_two_secondaries_within_area() {
        let (principal, secondaries) = family(1000, &[300, 400]);
        let reconciliation = reconcile(&principal, &secondaries).unwrap().unwrap();

        assert_eq!(reconciliation.secondary_area_total, Decimal::from(700));
        assert_eq!(reconciliation.remaining_area, Decimal::from(300));
        assert_eq!(reconciliation.consumed_percentage, Decimal::from(70));
        assert!(!reconciliation.has_area_inconsistency);
    }

    #[test]
    fn test_secondaries_exceeding_principal_floor_remaining_area() {
        let (principal, secondaries) = family(1000, &[1200]);
        let reconciliation = reconcile(&principal, &secondaries).unwrap().unwrap();

        assert_eq!(reconciliation.secondary_area_total, Decimal::from(1200));
        assert_eq!(reconciliation.remaining_area, Decimal::ZERO);
        assert_eq!(reconciliation.consumed_percentage, Decimal::from(120));
        assert!(reconciliation.has_area_inconsistency);
    }

    #[test]
    fn test_principal_without_secondaries() {
        let (principal, secondaries) = family(850, &[]);
        let reconciliation = reconcile(&principal, &secondaries).unwrap().unwrap();

        assert_eq!(reconciliation.secondary_area_total, Decimal::ZERO);
        assert_eq!(reconciliation.remaining_area, principal.total_area);
        assert_eq!(reconciliation.consumed_percentage, Decimal::ZERO);
        assert!(!reconciliation.has_area_inconsistency);
    }

    #[test]
    fn test_zero_area_principal_reports_zero_percent() {
        let (principal, secondaries) = family(0, &[10]);
        let reconciliation = reconcile(&principal, &secondaries).unwrap().unwrap();

        assert_eq!(reconciliation.consumed_percentage, Decimal::ZERO);
        assert_eq!(reconciliation.remaining_area, Decimal::ZERO);
        assert!(reconciliation.has_area_inconsistency);
    }

    #[test]
    fn test_secondary_is_not_reconciled() {
        let (_, secondaries) = family(1000, &[300]);
        assert_eq!(reconcile(&secondaries[0], &[]).unwrap(), None);
    }

    #[test]
    fn test_remaining_area_and_inconsistency_hold_across_area_grid() {
        for principal_area in [0, 1, 500, 1000] {
            for areas in [vec![], vec![0], vec![250, 250], vec![999, 2], vec![1000]] {
                let (principal, secondaries) = family(principal_area, &areas);
                let sum: i64 = areas.iter().sum();
                let reconciliation = reconcile(&principal, &secondaries).unwrap().unwrap();

                assert_eq!(
                    reconciliation.remaining_area,
                    Decimal::from((principal_area - sum).max(0))
                );
                assert_eq!(reconciliation.has_area_inconsistency, sum > principal_area);
            }
        }
    }

    #[test]
    fn test_unrelated_records_are_ignored() {
        let (principal, mut secondaries) = family(1000, &[100]);
        secondaries.push(property("MAT-900", 5000, Some(uuid::Uuid::new_v4())));

        let reconciliation = reconcile(&principal, &secondaries).unwrap().unwrap();
        assert_eq!(reconciliation.secondary_area_total, Decimal::from(100));
    }

    #[test]
    fn test_oversized_areas_fail_instead_of_panicking() {
        let mut principal = property("MAT-100", 1, None);
        let mut huge = property("MAT-101", 0, Some(principal.id));
        huge.total_area = Decimal::from_str("1000000000000000000000000000").unwrap();

        let result = reconcile(&principal, std::slice::from_ref(&huge));
        assert!(matches!(result, Err(ApiError::Internal(_))));

        let second = huge.clone();
        let result = reconcile(&principal, &[huge.clone(), second]);
        assert!(matches!(result, Err(ApiError::Internal(_))));

        principal.total_area = Decimal::MAX;
        huge.total_area = Decimal::MIN;
        let result = reconcile(&principal, &[huge]);
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }
}
