pub mod share;
pub mod validation;

pub use share::{decode, encode, share_url, token_from_url, ShareError, SharedInput};
pub use validation::{
    validate_coefficient_table, validate_event_name, validate_form, validate_organizers,
    validate_participant_name, validate_participants, validate_role_coefficient,
    validate_session_amounts, validate_total_amount, FormErrors, InputError,
};
