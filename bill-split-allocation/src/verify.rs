use serde::Serialize;
use tracing::warn;

use crate::multi_session::MultiSessionAllocationResult;
use crate::participant::ParticipantId;
use crate::session::{active_sessions, SessionAmount, SessionNumber};
use crate::split::AllocationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationValidation {
    pub is_valid: bool,
    pub calculated_total: u64,
    /// Absolute difference between the calculated and the expected total.
    pub difference: u64,
}

impl CalculationValidation {
    fn compare(calculated_total: u64, expected_total: u64) -> Self {
        let difference = calculated_total.abs_diff(expected_total);
        Self {
            is_valid: difference == 0,
            calculated_total,
            difference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionValidation {
    pub session: SessionNumber,
    pub expected_total: u64,
    pub calculated_total: u64,
    pub difference: u64,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSessionValidation {
    pub is_valid: bool,
    pub sessions: Vec<SessionValidation>,
    /// Participants whose total differs from the sum of their session amounts.
    pub inconsistent_totals: Vec<ParticipantId>,
}

/// Checks that single-session `results` add up to `expected_total`.
#[must_use]
pub fn validate_calculation(
    results: &[AllocationResult],
    expected_total: u64,
) -> CalculationValidation {
    let calculated_total = results.iter().map(|r| r.amount).sum();
    let validation = CalculationValidation::compare(calculated_total, expected_total);
    if !validation.is_valid {
        warn!(calculated_total, expected_total, "allocation does not add up");
    }
    validation
}

/// Checks every active session of `sessions` against the amounts allocated for it.
#[must_use]
pub fn validate_multi_session(
    results: &[MultiSessionAllocationResult],
    sessions: &[SessionAmount],
) -> MultiSessionValidation {
    let sessions: Vec<SessionValidation> = active_sessions(sessions)
        .into_iter()
        .map(|session| {
            let calculated_total = results
                .iter()
                .filter_map(|r| r.session(session.session))
                .map(|r| r.amount)
                .sum();
            let CalculationValidation {
                is_valid,
                calculated_total,
                difference,
            } = CalculationValidation::compare(calculated_total, session.amount);
            if !is_valid {
                warn!(
                    session = %session.session,
                    calculated_total,
                    expected_total = session.amount,
                    "session allocation does not add up"
                );
            }
            SessionValidation {
                session: session.session,
                expected_total: session.amount,
                calculated_total,
                difference,
                is_valid,
            }
        })
        .collect();

    let inconsistent_totals: Vec<ParticipantId> = results
        .iter()
        .filter(|r| r.session_results.iter().map(|s| s.amount).sum::<u64>() != r.total_amount)
        .map(|r| r.participant_id.clone())
        .collect();

    MultiSessionValidation {
        is_valid: inconsistent_totals.is_empty() && sessions.iter().all(|s| s.is_valid),
        sessions,
        inconsistent_totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    fn result(id: &str, amount: u64) -> AllocationResult {
        AllocationResult {
            participant_id: id.into(),
            name: id.to_owned(),
            role: Role::Junior,
            coefficient: 1.0,
            amount,
            is_organizer: false,
        }
    }

    #[test]
    fn exact_results_are_valid() {
        let validation = validate_calculation(&[result("1", 800), result("2", 1200)], 2000);
        assert_eq!(
            validation,
            CalculationValidation {
                is_valid: true,
                calculated_total: 2000,
                difference: 0
            }
        );
    }

    #[test]
    fn short_results_are_invalid() {
        let validation = validate_calculation(&[result("1", 800), result("2", 1100)], 2000);
        assert!(!validation.is_valid);
        assert_eq!(validation.calculated_total, 1900);
        assert_eq!(validation.difference, 100);
    }

    #[test]
    fn empty_results_match_a_zero_total() {
        assert!(validate_calculation(&[], 0).is_valid);
        assert_eq!(validate_calculation(&[], 5000).difference, 5000);
    }

    #[test]
    fn detects_tampered_participant_totals() {
        let session = SessionNumber::new(1).unwrap();
        let results = [MultiSessionAllocationResult {
            participant_id: "1".into(),
            name: "Tanaka".to_owned(),
            role: Role::Junior,
            session_results: vec![crate::multi_session::SessionResult {
                session,
                amount: 1000,
                coefficient: 1.0,
                is_organizer: false,
            }],
            total_amount: 999,
        }];
        let validation = validate_multi_session(&results, &[SessionAmount::new(session, 1000)]);
        assert!(validation.sessions[0].is_valid);
        assert_eq!(validation.inconsistent_totals, [ParticipantId::from("1")]);
        assert!(!validation.is_valid);
    }
}
