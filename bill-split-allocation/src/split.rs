use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::allocator::{allocate_base, check_amount, weigh};
use crate::error::{AllocationError, Result};
use crate::participant::{Participant, ParticipantId};
use crate::remainder::{self, RemainderPolicy};
use crate::role::{CoefficientTable, Role};

/// The amount one participant pays in a single-session split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub participant_id: ParticipantId,
    pub name: String,
    pub role: Role,
    pub coefficient: f64,
    pub amount: u64,
    #[serde(default)]
    pub is_organizer: bool,
}

/// Splits `total_amount` across `participants` weighted by their role.
///
/// The amounts always add up to `total_amount` exactly and are returned in the
/// order of `participants`. An empty participant list yields an empty result.
#[instrument(skip(participants, table), fields(participants = participants.len()))]
pub fn calculate_bill_split(
    total_amount: u64,
    participants: &[Participant],
    table: &CoefficientTable,
) -> Result<Vec<AllocationResult>> {
    if participants.is_empty() {
        return Ok(Vec::new());
    }
    let total_amount = check_amount(total_amount)?;
    let policy = RemainderPolicy::select(participants.iter().map(|p| p.is_organizer))
        .map_err(AllocationError::MultipleOrganizers)?;
    debug!(?policy, "selected remainder policy");

    let weighted = weigh(participants, table);
    let shares = allocate_base(total_amount, &weighted);
    let amounts = remainder::apply(policy, total_amount, &shares)?;

    Ok(shares
        .into_iter()
        .zip(amounts)
        .enumerate()
        .map(|(index, (share, amount))| AllocationResult {
            participant_id: share.participant.id.clone(),
            name: share.participant.name.clone(),
            role: share.participant.role,
            coefficient: share.coefficient,
            amount,
            is_organizer: policy.organizer() == Some(index),
        })
        .collect())
}
