//! Checks user input before it reaches the allocation.
//!
//! Error messages are shown to end users as they are.

use std::collections::{BTreeMap, BTreeSet};

use bill_split_allocation::{
    CoefficientTable, Participant, ParticipantId, Role, SessionAmount, SessionNumber,
};
use bill_split_config::Limits;
use thiserror::Error;

const INVALID_CHARACTERS: [char; 6] = ['<', '>', '"', '/', '\\', '&'];

fn contains_invalid_characters(text: &str) -> bool {
    text.contains(&INVALID_CHARACTERS[..])
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("名前を入力してください")]
    Empty,
    #[error("名前は{0}文字以内で入力してください")]
    TooLong(usize),
    #[error("使用できない文字が含まれています")]
    InvalidCharacters,
    #[error("この名前は既に登録されています")]
    Duplicate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("合計金額を入力してください")]
    Empty,
    #[error("有効な数値を入力してください")]
    NotANumber,
    #[error("金額は0より大きい値を入力してください")]
    NotPositive,
    #[error("金額は{0}円以下で入力してください")]
    TooLarge(u64),
    #[error("円単位で入力してください（小数点は使用できません）")]
    Fractional,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventNameError {
    #[error("イベント名は{0}文字以内で入力してください")]
    TooLong(usize),
    #[error("使用できない文字が含まれています")]
    InvalidCharacters,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticipantCountError {
    #[error("参加者を1人以上追加してください")]
    None,
    #[error("参加者は{0}人以下で設定してください")]
    TooMany(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoefficientError {
    #[error("有効な数値を入力してください")]
    NotANumber,
    #[error("係数は0より大きい値を入力してください")]
    NotPositive,
    #[error("係数は{0}以下で設定してください")]
    TooLarge(f64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrganizerError {
    #[error("幹事は1人だけ設定できます（{0}人が設定されています）")]
    Multiple(usize),
    #[error("{session}次会の幹事は1人だけ設定できます（{count}人が設定されています）")]
    MultipleInSession { session: SessionNumber, count: usize },
    #[error("{participant}は{session}次会に参加していないため幹事にできません")]
    NotAttending {
        participant: ParticipantId,
        session: SessionNumber,
    },
}

/// Any problem with a complete set of inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("参加者「{name}」: {source}")]
    Name { name: String, source: NameError },
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error(transparent)]
    EventName(#[from] EventNameError),
    #[error(transparent)]
    ParticipantCount(#[from] ParticipantCountError),
    #[error("{}の係数: {source}", .role.label())]
    Coefficient { role: Role, source: CoefficientError },
    #[error("{0}次会が重複しています")]
    DuplicateSession(SessionNumber),
    #[error(transparent)]
    Organizer(#[from] OrganizerError),
}

/// Returns the trimmed name if it is usable next to `existing` names.
pub fn validate_participant_name<'a>(
    name: &str,
    existing: impl IntoIterator<Item = &'a str>,
    limits: &Limits,
) -> Result<String, NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    if trimmed.chars().count() > limits.max_name_length {
        return Err(NameError::TooLong(limits.max_name_length));
    }
    if contains_invalid_characters(trimmed) {
        return Err(NameError::InvalidCharacters);
    }
    let lowercase = trimmed.to_lowercase();
    if existing
        .into_iter()
        .any(|other| other.trim().to_lowercase() == lowercase)
    {
        return Err(NameError::Duplicate);
    }
    Ok(trimmed.to_owned())
}

/// Parses a total amount typed by a user.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the value is a positive whole number below the limit"
)]
pub fn validate_total_amount(text: &str, limits: &Limits) -> Result<u64, AmountError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    let amount: f64 = trimmed.parse().map_err(|_| AmountError::NotANumber)?;
    if amount.is_nan() {
        return Err(AmountError::NotANumber);
    }
    if amount <= 0.0 {
        return Err(AmountError::NotPositive);
    }
    if amount > limits.max_total_amount as f64 {
        return Err(AmountError::TooLarge(limits.max_total_amount));
    }
    if amount.fract() != 0.0 {
        return Err(AmountError::Fractional);
    }
    Ok(amount as u64)
}

/// The numeric counterpart of [`validate_total_amount`].
pub const fn check_total_amount(amount: u64, limits: &Limits) -> Result<u64, AmountError> {
    if amount == 0 {
        Err(AmountError::NotPositive)
    } else if amount > limits.max_total_amount {
        Err(AmountError::TooLarge(limits.max_total_amount))
    } else {
        Ok(amount)
    }
}

/// The event name is optional, an empty one is fine.
pub fn validate_event_name(text: &str, limits: &Limits) -> Result<(), EventNameError> {
    let trimmed = text.trim();
    if trimmed.chars().count() > limits.max_event_name_length {
        return Err(EventNameError::TooLong(limits.max_event_name_length));
    }
    if contains_invalid_characters(trimmed) {
        return Err(EventNameError::InvalidCharacters);
    }
    Ok(())
}

pub const fn validate_participant_count(
    count: usize,
    limits: &Limits,
) -> Result<(), ParticipantCountError> {
    if count == 0 {
        Err(ParticipantCountError::None)
    } else if count > limits.max_participants {
        Err(ParticipantCountError::TooMany(limits.max_participants))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub event_name: Option<EventNameError>,
    pub total_amount: Option<AmountError>,
    pub participants: Option<ParticipantCountError>,
}

impl FormErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.event_name.is_none() && self.total_amount.is_none() && self.participants.is_none()
    }
}

pub fn validate_form(
    event_name: &str,
    total_amount: &str,
    participant_count: usize,
    limits: &Limits,
) -> FormErrors {
    FormErrors {
        event_name: validate_event_name(event_name, limits).err(),
        total_amount: validate_total_amount(total_amount, limits).err(),
        participants: validate_participant_count(participant_count, limits).err(),
    }
}

pub fn validate_role_coefficient(value: f64, limits: &Limits) -> Result<f64, CoefficientError> {
    if value.is_nan() {
        Err(CoefficientError::NotANumber)
    } else if value <= 0.0 {
        Err(CoefficientError::NotPositive)
    } else if value > limits.max_coefficient {
        Err(CoefficientError::TooLarge(limits.max_coefficient))
    } else {
        Ok(value)
    }
}

pub fn validate_coefficient_table(
    table: &CoefficientTable,
    limits: &Limits,
) -> Result<(), InputError> {
    table.iter().try_for_each(|(role, value)| {
        validate_role_coefficient(value, limits)
            .map(drop)
            .map_err(|source| InputError::Coefficient { role, source })
    })
}

/// Session numbers have to be unique.
pub fn validate_session_amounts(sessions: &[SessionAmount]) -> Result<(), InputError> {
    let mut seen = BTreeSet::new();
    sessions
        .iter()
        .find(|s| !seen.insert(s.session))
        .map_or(Ok(()), |s| Err(InputError::DuplicateSession(s.session)))
}

/// At most one organizer overall and per session; organized sessions are attended.
pub fn validate_organizers(participants: &[Participant]) -> Result<(), OrganizerError> {
    let organizers = participants.iter().filter(|p| p.is_organizer).count();
    if organizers > 1 {
        return Err(OrganizerError::Multiple(organizers));
    }

    let mut per_session: BTreeMap<SessionNumber, usize> = BTreeMap::new();
    for participant in participants {
        for &session in &participant.organizing_sessions {
            if !participant.attends(session) {
                return Err(OrganizerError::NotAttending {
                    participant: participant.id.clone(),
                    session,
                });
            }
            *per_session.entry(session).or_default() += 1;
        }
    }
    per_session
        .into_iter()
        .find(|&(_, count)| count > 1)
        .map_or(Ok(()), |(session, count)| {
            Err(OrganizerError::MultipleInSession { session, count })
        })
}

/// Validates every participant name against the names before it.
pub fn validate_participants(
    participants: &[Participant],
    limits: &Limits,
) -> Result<(), InputError> {
    validate_participant_count(participants.len(), limits)?;
    for (index, participant) in participants.iter().enumerate() {
        let earlier = participants[..index].iter().map(|p| p.name.as_str());
        validate_participant_name(&participant.name, earlier, limits).map_err(|source| {
            InputError::Name {
                name: participant.name.clone(),
                source,
            }
        })?;
    }
    validate_organizers(participants)?;
    Ok(())
}
