use crate::error::{AllocationError, Result};
use crate::participant::Participant;
use crate::role::{resolve_coefficient, CoefficientTable};

/// Largest amount that is still exactly representable as `f64`.
pub const MAX_AMOUNT: u64 = 1 << 53;

/// A participant together with the coefficient it is weighted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weighted<'a> {
    pub participant: &'a Participant,
    pub coefficient: f64,
}

/// The real valued, not yet rounded share of a participant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseShare<'a> {
    pub participant: &'a Participant,
    pub coefficient: f64,
    pub share: f64,
}

pub fn weigh<'a>(
    participants: impl IntoIterator<Item = &'a Participant>,
    table: &CoefficientTable,
) -> Vec<Weighted<'a>> {
    participants
        .into_iter()
        .map(|participant| Weighted {
            participant,
            coefficient: resolve_coefficient(participant.role, table),
        })
        .collect()
}

pub const fn check_amount(amount: u64) -> Result<u64> {
    if amount > MAX_AMOUNT {
        Err(AllocationError::AmountTooLarge(amount))
    } else {
        Ok(amount)
    }
}

/// Splits `total_amount` proportionally to the coefficients, keeping input order.
#[allow(clippy::cast_precision_loss, reason = "amounts are bounded by MAX_AMOUNT")]
#[must_use]
pub fn allocate_base<'a>(total_amount: u64, weighted: &[Weighted<'a>]) -> Vec<BaseShare<'a>> {
    if weighted.is_empty() {
        return Vec::new();
    }
    let coefficient_sum: f64 = weighted.iter().map(|w| w.coefficient).sum();
    let total = total_amount as f64;
    weighted
        .iter()
        .map(|w| BaseShare {
            participant: w.participant,
            coefficient: w.coefficient,
            share: total * w.coefficient / coefficient_sum,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    #[test]
    fn empty_input_yields_no_shares() {
        assert!(allocate_base(5000, &[]).is_empty());
    }

    #[test]
    fn shares_are_proportional_and_ordered() {
        let participants = [
            Participant::new("a", "A", Role::Junior),
            Participant::new("b", "B", Role::Manager),
        ];
        let weighted = weigh(&participants, &CoefficientTable::default());
        let shares = allocate_base(3000, &weighted);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].participant.id, participants[0].id);
        assert!((shares[0].share - 1000.0).abs() < 1e-9);
        assert!((shares[1].share - 2000.0).abs() < 1e-9);
        assert!((shares[1].coefficient - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_amounts_beyond_exact_float_range() {
        assert_eq!(check_amount(MAX_AMOUNT), Ok(MAX_AMOUNT));
        assert_eq!(
            check_amount(MAX_AMOUNT + 1),
            Err(AllocationError::AmountTooLarge(MAX_AMOUNT + 1))
        );
    }
}
