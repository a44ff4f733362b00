use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, Result};

/// Number of a session (first party, second party, ...), always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SessionNumber(u8);

impl SessionNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub const fn new(number: u8) -> Result<Self> {
        if number >= Self::MIN && number <= Self::MAX {
            Ok(Self(number))
        } else {
            Err(AllocationError::InvalidSessionNumber(number))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for SessionNumber {
    type Error = AllocationError;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number)
    }
}

impl From<SessionNumber> for u8 {
    fn from(session: SessionNumber) -> Self {
        session.0
    }
}

impl Display for SessionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Declared amount of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSessionAmount")]
pub struct SessionAmount {
    pub session: SessionNumber,
    pub amount: u64,
    pub label: String,
}

#[derive(Deserialize)]
struct RawSessionAmount {
    session: SessionNumber,
    amount: u64,
    #[serde(default)]
    label: Option<String>,
}

impl From<RawSessionAmount> for SessionAmount {
    fn from(raw: RawSessionAmount) -> Self {
        let session = Self::new(raw.session, raw.amount);
        match raw.label {
            Some(label) => session.with_label(label),
            None => session,
        }
    }
}

impl SessionAmount {
    #[must_use]
    pub fn new(session: SessionNumber, amount: u64) -> Self {
        Self {
            session,
            amount,
            label: format!("{session}次会"),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Only sessions with a positive amount take part in an allocation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.amount > 0
    }
}

/// Active sessions ordered by session number.
pub fn active_sessions(sessions: &[SessionAmount]) -> Vec<&SessionAmount> {
    let mut active: Vec<&SessionAmount> = sessions.iter().filter(|s| s.is_active()).collect();
    active.sort_by_key(|s| s.session);
    active
}
