use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use bill_split_allocation::{CoefficientTable, Participant, SessionAmount};
use bill_split_config::Limits;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{
    check_total_amount, validate_coefficient_table, validate_event_name, validate_participants,
    validate_session_amounts, InputError,
};

pub const QUERY_PARAMETER: &str = "data";

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("share token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("share token does not contain valid input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("share link has no data parameter")]
    MissingData,
}

/// Everything needed to recompute a split. Results are never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default)]
    pub total_amount: u64,
    pub participants: Vec<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_coefficients: Option<CoefficientTable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<SessionAmount>,
}

impl SharedInput {
    #[must_use]
    pub fn is_multi_session(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Runs every input check; multi-session input is checked per session instead
    /// of by its total amount.
    pub fn validate(&self, limits: &Limits) -> Result<(), InputError> {
        if let Some(event_name) = &self.event_name {
            validate_event_name(event_name, limits)?;
        }
        if self.is_multi_session() {
            validate_session_amounts(&self.sessions)?;
            for session in self.sessions.iter().filter(|s| s.is_active()) {
                check_total_amount(session.amount, limits)?;
            }
        } else {
            check_total_amount(self.total_amount, limits)?;
        }
        if let Some(table) = &self.role_coefficients {
            validate_coefficient_table(table, limits)?;
        }
        validate_participants(&self.participants, limits)
    }
}

pub fn encode(input: &SharedInput) -> Result<String, ShareError> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(input)?))
}

pub fn decode(token: &str) -> Result<SharedInput, ShareError> {
    let json = URL_SAFE_NO_PAD.decode(token.trim())?;
    let input = serde_json::from_slice(&json)?;
    tracing::debug!(bytes = json.len(), "decoded share token");
    Ok(input)
}

#[must_use]
pub fn share_url(base: &str, token: &str) -> String {
    format!("{base}?{QUERY_PARAMETER}={token}")
}

/// Accepts either a complete share link or a bare token.
pub fn token_from_url(url: &str) -> Result<&str, ShareError> {
    let url = url.trim();
    let Some((_, query)) = url.split_once('?') else {
        return Ok(url);
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(QUERY_PARAMETER)?.strip_prefix('='))
        .filter(|token| !token.is_empty())
        .ok_or(ShareError::MissingData)
}

#[cfg(test)]
mod tests {
    use bill_split_allocation::{Role, SessionNumber};

    use super::*;

    fn input() -> SharedInput {
        SharedInput {
            event_name: Some("忘年会".to_owned()),
            total_amount: 12_345,
            participants: vec![
                Participant::new("1", "田中", Role::Junior),
                Participant::new("2", "佐藤", Role::Manager).organizer(),
            ],
            role_coefficients: Some(CoefficientTable::default()),
            sessions: Vec::new(),
        }
    }

    #[test]
    fn token_survives_a_share_link() {
        let input = input();
        let url = share_url("https://split.example/", &encode(&input).unwrap());
        assert!(url.starts_with("https://split.example/?data="));
        let decoded = decode(token_from_url(&url).unwrap()).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn tokens_are_url_safe() {
        let token = encode(&input()).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn extracts_tokens() {
        assert_eq!(token_from_url("abc").unwrap(), "abc");
        assert_eq!(token_from_url("/?x=1&data=abc#top").unwrap(), "abc");
        assert!(matches!(token_from_url("/?x=1"), Err(ShareError::MissingData)));
        assert!(matches!(token_from_url("/?data="), Err(ShareError::MissingData)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode("%%%"), Err(ShareError::Base64(_))));
        assert!(matches!(
            decode(&URL_SAFE_NO_PAD.encode("not json")),
            Err(ShareError::Json(_))
        ));
        let unknown_role =
            r#"{"totalAmount":100,"participants":[{"id":"1","name":"a","role":"intern"}]}"#;
        assert!(matches!(
            decode(&URL_SAFE_NO_PAD.encode(unknown_role)),
            Err(ShareError::Json(_))
        ));
        let bad_table = r#"{
            "totalAmount": 100,
            "participants": [],
            "roleCoefficients": {"junior": 1, "middle": 1, "senior": 1, "manager": 0}
        }"#;
        assert!(matches!(
            decode(&URL_SAFE_NO_PAD.encode(bad_table)),
            Err(ShareError::Json(_))
        ));
    }

    #[test]
    fn validates_single_and_multi_session_input() {
        let limits = Limits::default();
        assert_eq!(input().validate(&limits), Ok(()));

        let mut empty = input();
        empty.total_amount = 0;
        assert!(empty.validate(&limits).is_err());

        let session = SessionNumber::new(1).unwrap();
        let mut multi = input();
        multi.total_amount = 0;
        multi.participants[1].is_organizer = false;
        multi.participants[0].attending_sessions.insert(session);
        multi.sessions = vec![SessionAmount::new(session, 3000)];
        assert!(multi.is_multi_session());
        assert_eq!(multi.validate(&limits), Ok(()));
    }
}
