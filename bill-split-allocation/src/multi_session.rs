use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::allocator::{allocate_base, check_amount, weigh};
use crate::error::{AllocationError, Result};
use crate::participant::{Participant, ParticipantId};
use crate::remainder::{self, RemainderPolicy};
use crate::role::{CoefficientTable, Role};
use crate::session::{active_sessions, SessionAmount, SessionNumber};

/// What a participant pays for one session they attended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub session: SessionNumber,
    pub amount: u64,
    pub coefficient: f64,
    #[serde(default)]
    pub is_organizer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSessionAllocationResult {
    pub participant_id: ParticipantId,
    pub name: String,
    pub role: Role,
    pub session_results: Vec<SessionResult>,
    pub total_amount: u64,
}

impl MultiSessionAllocationResult {
    fn new(participant: &Participant) -> Self {
        Self {
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            role: participant.role,
            session_results: Vec::new(),
            total_amount: 0,
        }
    }

    fn push(&mut self, result: SessionResult) {
        self.total_amount += result.amount;
        self.session_results.push(result);
    }

    #[must_use]
    pub fn session(&self, session: SessionNumber) -> Option<&SessionResult> {
        self.session_results.iter().find(|r| r.session == session)
    }
}

/// Splits every active session independently among its attendees and sums the
/// per-session amounts per participant.
///
/// Every participant appears in the output in input order, with results only for
/// the sessions they attend. Sessions without attendees are skipped.
#[instrument(skip_all, fields(sessions = sessions.len(), participants = participants.len()))]
pub fn allocate_multi_session(
    sessions: &[SessionAmount],
    participants: &[Participant],
    table: &CoefficientTable,
) -> Result<Vec<MultiSessionAllocationResult>> {
    let active = active_sessions(sessions);
    if active.is_empty() || participants.is_empty() {
        return Ok(Vec::new());
    }

    let mut results: Vec<MultiSessionAllocationResult> = participants
        .iter()
        .map(MultiSessionAllocationResult::new)
        .collect();

    for session in active {
        let attendees: Vec<usize> = participants
            .iter()
            .enumerate()
            .filter(|(_, participant)| participant.attends(session.session))
            .map(|(index, _)| index)
            .collect();
        if attendees.is_empty() {
            warn!(
                session = %session.session,
                amount = session.amount,
                "session has an amount but no attendees"
            );
            continue;
        }

        let session_results =
            allocate_session(session, attendees.iter().map(|&index| &participants[index]), table)?;
        for (index, result) in attendees.into_iter().zip(session_results) {
            results[index].push(result);
        }
    }
    Ok(results)
}

fn allocate_session<'a>(
    session: &SessionAmount,
    attendees: impl Iterator<Item = &'a Participant> + Clone,
    table: &CoefficientTable,
) -> Result<Vec<SessionResult>> {
    let amount = check_amount(session.amount)?;
    let policy = RemainderPolicy::select(attendees.clone().map(|p| p.organizes(session.session)))
        .map_err(|count| AllocationError::MultipleSessionOrganizers {
            session: session.session,
            count,
        })?;
    debug!(session = %session.session, ?policy, "selected remainder policy");

    let weighted = weigh(attendees, table);
    let shares = allocate_base(amount, &weighted);
    let amounts = remainder::apply(policy, amount, &shares)?;

    Ok(shares
        .into_iter()
        .zip(amounts)
        .enumerate()
        .map(|(index, (share, amount))| SessionResult {
            session: session.session,
            amount,
            coefficient: share.coefficient,
            is_organizer: policy.organizer() == Some(index),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(number: u8) -> SessionNumber {
        SessionNumber::new(number).unwrap()
    }

    #[test]
    fn no_active_sessions_yield_nothing() {
        let participants = [Participant::new("1", "Tanaka", Role::Junior).attending([session(1)])];
        let sessions = [SessionAmount::new(session(1), 0)];
        let results =
            allocate_multi_session(&sessions, &participants, &CoefficientTable::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn session_organizer_absorbs_only_in_their_session() {
        let participants = [
            Participant::new("1", "Tanaka", Role::Junior)
                .attending([session(1), session(2)])
                .organizing(session(2)),
            Participant::new("2", "Sato", Role::Junior).attending([session(1), session(2)]),
            Participant::new("3", "Suzuki", Role::Junior).attending([session(1), session(2)]),
        ];
        let sessions = [
            SessionAmount::new(session(1), 1000),
            SessionAmount::new(session(2), 1000),
        ];
        let results =
            allocate_multi_session(&sessions, &participants, &CoefficientTable::default()).unwrap();

        let first = results[0].session(session(1)).unwrap();
        assert_eq!(first.amount, 400);
        assert!(!first.is_organizer);

        let second = results[0].session(session(2)).unwrap();
        assert_eq!(second.amount, 400);
        assert!(second.is_organizer);
        assert_eq!(results[1].session(session(2)).unwrap().amount, 300);
        assert_eq!(results[0].total_amount, 800);
    }

    #[test]
    fn organizing_without_attending_is_ignored() {
        let mut organizer = Participant::new("1", "Tanaka", Role::Junior).organizing(session(1));
        organizer.attending_sessions.clear();
        let participants = [
            organizer,
            Participant::new("2", "Sato", Role::Junior).attending([session(1)]),
        ];
        let sessions = [SessionAmount::new(session(1), 1234)];
        let results =
            allocate_multi_session(&sessions, &participants, &CoefficientTable::default()).unwrap();

        assert!(results[0].session_results.is_empty());
        assert_eq!(results[0].total_amount, 0);
        assert_eq!(results[1].total_amount, 1234);
        assert!(!results[1].session_results[0].is_organizer);
    }

    #[test]
    fn rejects_two_organizers_in_one_session() {
        let participants = [
            Participant::new("1", "Tanaka", Role::Junior).organizing(session(3)),
            Participant::new("2", "Sato", Role::Junior).organizing(session(3)),
        ];
        let sessions = [SessionAmount::new(session(3), 3000)];
        assert_eq!(
            allocate_multi_session(&sessions, &participants, &CoefficientTable::default()),
            Err(AllocationError::MultipleSessionOrganizers {
                session: session(3),
                count: 2
            })
        );
    }

    #[test]
    fn session_results_follow_session_order() {
        let participants =
            [Participant::new("1", "Tanaka", Role::Junior).attending([session(1), session(2)])];
        let sessions = [
            SessionAmount::new(session(2), 500),
            SessionAmount::new(session(1), 700),
        ];
        let results =
            allocate_multi_session(&sessions, &participants, &CoefficientTable::default()).unwrap();
        let numbers: Vec<u8> = results[0]
            .session_results
            .iter()
            .map(|r| r.session.get())
            .collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(results[0].total_amount, 1200);
    }
}
