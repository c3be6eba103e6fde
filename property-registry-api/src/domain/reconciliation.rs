use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Area figures derived for a principal from its secondaries.
///
/// Computed on read, never stored. `remaining_area` floors at zero, so
/// `has_area_inconsistency` is the only signal that the secondaries declare
/// more area than the principal has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaReconciliation {
    /// Sum of `total_area` over the direct secondaries
    pub secondary_area_total: Decimal,
    pub remaining_area: Decimal,
    /// Share of the principal's area taken by secondaries, unrounded
    pub consumed_percentage: Decimal,
    pub has_area_inconsistency: bool,
}

impl AreaReconciliation {
    /// Percentage rounded to two places for display
    pub fn display_percentage(&self) -> Decimal {
        self.consumed_percentage
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_percentage_rounds_half_away_from_zero() {
        let reconciliation = AreaReconciliation {
            secondary_area_total: Decimal::ONE,
            remaining_area: Decimal::from(2),
            consumed_percentage: Decimal::from_str("33.335").unwrap(),
            has_area_inconsistency: false,
        };
        assert_eq!(
            reconciliation.display_percentage(),
            Decimal::from_str("33.34").unwrap()
        );
    }
}
