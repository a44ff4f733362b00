//! Turns real valued shares into integer amounts that add up to the total.
//!
//! Two policies exist. If exactly one participant organizes, everybody else is
//! rounded down to the next hundred and the organizer pays whatever is left.
//! Otherwise everybody is rounded down to the next hundred and the missing
//! hundreds go to the participants with the largest cut-off remainders.

use itertools::Itertools;
use tracing::trace;

use crate::allocator::BaseShare;
use crate::error::{AllocationError, Result};

/// Amounts are rounded in units of this size.
pub const ROUNDING_UNIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// The participant at this index absorbs every remainder.
    OrganizerAbsorbs { organizer: usize },
    LargestRemainder,
}

impl RemainderPolicy {
    /// Picks the policy from the organizer flags of the participants, in input order.
    ///
    /// Returns the number of flagged participants if more than one is flagged.
    pub fn select(
        organizer_flags: impl IntoIterator<Item = bool>,
    ) -> core::result::Result<Self, usize> {
        let organizers: Vec<usize> = organizer_flags
            .into_iter()
            .positions(|flag| flag)
            .collect();
        match organizers.as_slice() {
            [] => Ok(Self::LargestRemainder),
            [organizer] => Ok(Self::OrganizerAbsorbs {
                organizer: *organizer,
            }),
            _ => Err(organizers.len()),
        }
    }

    #[must_use]
    pub const fn organizer(self) -> Option<usize> {
        match self {
            Self::OrganizerAbsorbs { organizer } => Some(organizer),
            Self::LargestRemainder => None,
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "shares are non-negative and bounded by the total"
)]
fn floor_to_unit(share: f64) -> u64 {
    (share / 100.0).floor() as u64 * ROUNDING_UNIT
}

/// Applies `policy` to `shares`; the returned amounts are in the order of `shares`.
pub fn apply(
    policy: RemainderPolicy,
    total_amount: u64,
    shares: &[BaseShare<'_>],
) -> Result<Vec<u64>> {
    if shares.is_empty() {
        return Ok(Vec::new());
    }
    match policy {
        RemainderPolicy::OrganizerAbsorbs { organizer } => {
            organizer_absorbs(total_amount, shares, organizer)
        }
        RemainderPolicy::LargestRemainder => largest_remainder(total_amount, shares),
    }
}

fn organizer_absorbs(
    total_amount: u64,
    shares: &[BaseShare<'_>],
    organizer: usize,
) -> Result<Vec<u64>> {
    let mut amounts: Vec<u64> = shares
        .iter()
        .enumerate()
        .map(|(index, share)| {
            if index == organizer {
                0
            } else {
                floor_to_unit(share.share)
            }
        })
        .collect();
    let others: u64 = amounts.iter().sum();
    let organizer_amount = total_amount
        .checked_sub(others)
        .ok_or_else(|| AllocationError::NegativeAmount(shares[organizer].participant.id.clone()))?;
    trace!(others, organizer_amount, "organizer absorbs remainder");
    amounts[organizer] = organizer_amount;
    Ok(amounts)
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "bounded by the participant count"
)]
fn largest_remainder(total_amount: u64, shares: &[BaseShare<'_>]) -> Result<Vec<u64>> {
    let mut amounts: Vec<u64> = shares.iter().map(|share| floor_to_unit(share.share)).collect();
    let remainders: Vec<f64> = shares
        .iter()
        .zip(&amounts)
        .map(|(share, &amount)| share.share - amount as f64)
        .collect();

    // stable, so ties keep the input order
    let ranking: Vec<usize> = (0..shares.len())
        .sorted_by(|&a, &b| remainders[b].total_cmp(&remainders[a]))
        .collect();

    let floored: u64 = amounts.iter().sum();
    let increments = total_amount
        .checked_sub(floored)
        .map_or(0, |shortfall| (shortfall + ROUNDING_UNIT / 2) / ROUNDING_UNIT)
        .min(shares.len() as u64);
    trace!(floored, increments, "distributing hundreds by largest remainder");
    for &index in ranking.iter().take(increments as usize) {
        amounts[index] += ROUNDING_UNIT;
    }

    // whatever is below one unit goes to the first ranked participant
    let allocated: u64 = amounts.iter().sum();
    if allocated != total_amount {
        let first = ranking[0];
        amounts[first] = (amounts[first] + total_amount)
            .checked_sub(allocated)
            .ok_or_else(|| AllocationError::NegativeAmount(shares[first].participant.id.clone()))?;
    }
    Ok(amounts)
}
