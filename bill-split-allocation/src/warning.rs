use core::fmt::{self, Display};

use crate::participant::Participant;
use crate::remainder::ROUNDING_UNIT;

#[must_use]
pub const fn has_remainder(total_amount: u64) -> bool {
    total_amount % ROUNDING_UNIT != 0
}

#[must_use]
pub fn has_organizer(participants: &[Participant]) -> bool {
    participants.iter().any(|p| p.is_organizer)
}

/// The total cannot be split into hundreds and nobody absorbs the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainderWarning {
    pub remainder: u64,
}

impl Display for RemainderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "合計金額に{}円の端数があります。幹事を設定すると端数は幹事の負担になります。",
            self.remainder
        )
    }
}

#[must_use]
pub fn remainder_warning(
    total_amount: u64,
    participants: &[Participant],
) -> Option<RemainderWarning> {
    (has_remainder(total_amount) && !has_organizer(participants)).then_some(RemainderWarning {
        remainder: total_amount % ROUNDING_UNIT,
    })
}
