use thiserror::Error;

use crate::participant::ParticipantId;
use crate::role::Role;
use crate::session::SessionNumber;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("unknown role {0:?}, expected one of junior, middle, senior, manager")]
    UnknownRole(String),
    #[error("coefficient for {role} must be a positive finite number, got {value}")]
    InvalidCoefficient { role: Role, value: f64 },
    #[error("amount {0} is too large to be split exactly")]
    AmountTooLarge(u64),
    #[error("session number {0} is outside of 1..=10")]
    InvalidSessionNumber(u8),
    #[error("{0} participants are flagged as organizer, at most one is allowed")]
    MultipleOrganizers(usize),
    #[error(
        "{count} participants are flagged as organizer of session {session}, at most one is \
         allowed"
    )]
    MultipleSessionOrganizers { session: SessionNumber, count: usize },
    #[error("participant {0} does not exist")]
    UnknownParticipant(ParticipantId),
    #[error("participant {0} already exists")]
    DuplicateParticipant(ParticipantId),
    #[error("participant {participant} does not attend session {session}")]
    NotAttending {
        participant: ParticipantId,
        session: SessionNumber,
    },
    #[error("allocation would assign a negative amount to participant {0}")]
    NegativeAmount(ParticipantId),
}

pub type Result<T> = core::result::Result<T, AllocationError>;
