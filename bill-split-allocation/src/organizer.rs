//! Operations that keep at most one organizer per scope.

use crate::error::{AllocationError, Result};
use crate::participant::{Participant, ParticipantId};
use crate::session::SessionNumber;

fn position(participants: &[Participant], id: &ParticipantId) -> Result<usize> {
    participants
        .iter()
        .position(|p| &p.id == id)
        .ok_or_else(|| AllocationError::UnknownParticipant(id.clone()))
}

/// Makes `id` the only single-session organizer.
pub fn set_sole_organizer(participants: &mut [Participant], id: &ParticipantId) -> Result<()> {
    let index = position(participants, id)?;
    for (i, participant) in participants.iter_mut().enumerate() {
        participant.is_organizer = i == index;
    }
    Ok(())
}

pub fn clear_organizer(participants: &mut [Participant]) {
    for participant in participants {
        participant.is_organizer = false;
    }
}

/// Makes `id` the only organizer of `session`. The participant has to attend it.
pub fn set_sole_session_organizer(
    participants: &mut [Participant],
    session: SessionNumber,
    id: &ParticipantId,
) -> Result<()> {
    let index = position(participants, id)?;
    if !participants[index].attends(session) {
        return Err(AllocationError::NotAttending {
            participant: id.clone(),
            session,
        });
    }
    for (i, participant) in participants.iter_mut().enumerate() {
        if i == index {
            participant.organizing_sessions.insert(session);
        } else {
            participant.organizing_sessions.remove(&session);
        }
    }
    Ok(())
}

/// Appends `participant`. A new organizer replaces the existing one.
pub fn add_participant(
    participants: &mut Vec<Participant>,
    participant: Participant,
) -> Result<()> {
    add_participants(participants, [participant])
}

/// Appends `batch`. If the batch contains organizers, the last of them becomes the
/// only organizer of the whole list.
pub fn add_participants(
    participants: &mut Vec<Participant>,
    batch: impl IntoIterator<Item = Participant>,
) -> Result<()> {
    let mut batch: Vec<Participant> = batch.into_iter().collect();
    for (i, participant) in batch.iter().enumerate() {
        let duplicate = participants
            .iter()
            .chain(&batch[..i])
            .any(|existing| existing.id == participant.id);
        if duplicate {
            return Err(AllocationError::DuplicateParticipant(participant.id.clone()));
        }
    }

    if let Some(last) = batch.iter().rposition(|p| p.is_organizer) {
        clear_organizer(participants);
        for (i, participant) in batch.iter_mut().enumerate() {
            participant.is_organizer = i == last;
        }
    }
    participants.append(&mut batch);
    Ok(())
}
