use alloc::collections::BTreeSet;
use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::session::SessionNumber;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A person sharing the bill.
///
/// Absent flags and sets deserialize to `false` and empty sets.
/// A session in `organizing_sessions` only counts while it is also in
/// `attending_sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub is_organizer: bool,
    #[serde(default)]
    pub attending_sessions: BTreeSet<SessionNumber>,
    #[serde(default)]
    pub organizing_sessions: BTreeSet<SessionNumber>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            is_organizer: false,
            attending_sessions: BTreeSet::new(),
            organizing_sessions: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn organizer(mut self) -> Self {
        self.is_organizer = true;
        self
    }

    #[must_use]
    pub fn attending(mut self, sessions: impl IntoIterator<Item = SessionNumber>) -> Self {
        self.attending_sessions.extend(sessions);
        self
    }

    #[must_use]
    pub fn organizing(mut self, session: SessionNumber) -> Self {
        self.attending_sessions.insert(session);
        self.organizing_sessions.insert(session);
        self
    }

    #[must_use]
    pub fn attends(&self, session: SessionNumber) -> bool {
        self.attending_sessions.contains(&session)
    }

    #[must_use]
    pub fn organizes(&self, session: SessionNumber) -> bool {
        self.attends(session) && self.organizing_sessions.contains(&session)
    }
}
