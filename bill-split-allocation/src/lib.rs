//! Splits a shared bill across participants proportionally to role coefficients.
//!
//! Amounts are integer yen and always add up to the input total exactly.

extern crate alloc;

pub mod allocator;
pub mod error;
pub mod multi_session;
pub mod organizer;
pub mod participant;
pub mod remainder;
pub mod role;
pub mod session;
pub mod split;
pub mod verify;
pub mod warning;

pub use error::AllocationError;
pub use multi_session::{allocate_multi_session, MultiSessionAllocationResult, SessionResult};
pub use organizer::{
    add_participant, add_participants, clear_organizer, set_sole_organizer,
    set_sole_session_organizer,
};
pub use participant::{Participant, ParticipantId};
pub use remainder::{RemainderPolicy, ROUNDING_UNIT};
pub use role::{resolve_coefficient, CoefficientTable, Role};
pub use session::{SessionAmount, SessionNumber};
pub use split::{calculate_bill_split, AllocationResult};
pub use verify::{
    validate_calculation, validate_multi_session, CalculationValidation, MultiSessionValidation,
    SessionValidation,
};
pub use warning::{has_organizer, has_remainder, remainder_warning, RemainderWarning};
