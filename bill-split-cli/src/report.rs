use std::path::{Path, PathBuf};

use bill_split_allocation::{
    allocate_multi_session, calculate_bill_split, remainder_warning, validate_calculation,
    validate_multi_session, CoefficientTable,
};
use bill_split_config::Config;
use bill_split_export::{
    csv_filename, format_multi_session_results, format_results, multi_session_csv,
    single_session_csv,
};
use bill_split_input::SharedInput;
use chrono::NaiveDateTime;
use tracing::{info, instrument};

use crate::error::CliError;

/// A checked allocation ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub summary: String,
    pub warning: Option<String>,
    pub csv: String,
}

/// Validates `input`, allocates it and refuses results whose amounts do not add up.
#[instrument(skip_all, fields(multi_session = input.is_multi_session()))]
pub fn build_report(
    input: &SharedInput,
    config: &Config,
    generated_at: NaiveDateTime,
) -> Result<Report, CliError> {
    input.validate(&config.limits)?;
    let table: &CoefficientTable = input.role_coefficients.as_ref().unwrap_or(&config.coefficients);
    let event_name = input.event_name.as_deref().unwrap_or_default();

    if input.is_multi_session() {
        let results = allocate_multi_session(&input.sessions, &input.participants, table)?;
        let validation = validate_multi_session(&results, &input.sessions);
        if let Some(session) = validation.sessions.iter().find(|s| !s.is_valid) {
            return Err(CliError::SessionMismatch {
                session: session.session,
                expected: session.expected_total,
                calculated: session.calculated_total,
            });
        }
        if let Some(participant) = validation.inconsistent_totals.first() {
            return Err(CliError::InconsistentTotal(participant.clone()));
        }
        Ok(Report {
            summary: format_multi_session_results(&results, &input.sessions),
            warning: None,
            csv: multi_session_csv(&results, &input.sessions, event_name, generated_at),
        })
    } else {
        let results = calculate_bill_split(input.total_amount, &input.participants, table)?;
        let validation = validate_calculation(&results, input.total_amount);
        if !validation.is_valid {
            return Err(CliError::TotalMismatch {
                expected: input.total_amount,
                calculated: validation.calculated_total,
            });
        }
        Ok(Report {
            summary: format_results(&results),
            warning: remainder_warning(input.total_amount, &input.participants)
                .map(|warning| warning.to_string()),
            csv: single_session_csv(&results, event_name, input.total_amount, generated_at),
        })
    }
}

/// Writes the report into `target`, or into a generated file name when `target`
/// is a directory. Returns the path written.
pub fn write_csv(
    report: &Report,
    target: &Path,
    event_name: &str,
    generated_at: NaiveDateTime,
) -> Result<PathBuf, CliError> {
    let path = if target.is_dir() {
        target.join(csv_filename(event_name, generated_at.date()))
    } else {
        target.to_owned()
    };
    std::fs::write(&path, &report.csv)?;
    info!(path = %path.display(), "wrote csv report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use bill_split_allocation::{Participant, Role, SessionAmount, SessionNumber};
    use chrono::NaiveDate;

    use super::*;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 20)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    }

    fn input(total_amount: u64, participants: Vec<Participant>) -> SharedInput {
        SharedInput {
            event_name: Some("忘年会".to_owned()),
            total_amount,
            participants,
            role_coefficients: None,
            sessions: Vec::new(),
        }
    }

    fn trio() -> Vec<Participant> {
        vec![
            Participant::new("1", "田中", Role::Junior),
            Participant::new("2", "佐藤", Role::Manager),
            Participant::new("3", "鈴木", Role::Middle),
        ]
    }

    #[test]
    fn single_session_report_warns_about_the_remainder() {
        let report =
            build_report(&input(1234, trio()), &Config::default(), generated_at()).unwrap();
        assert_eq!(
            report.summary,
            "田中（ジュニア）: ¥334\n佐藤（マネージャー）: ¥600\n鈴木（ミドル）: ¥300"
        );
        assert!(report.warning.unwrap().contains("34円"));
        assert!(report.csv.contains("田中,ジュニア,1,334,未"));
    }

    #[test]
    fn organizer_silences_the_warning() {
        let mut participants = trio();
        participants[1].is_organizer = true;
        let report =
            build_report(&input(1234, participants), &Config::default(), generated_at()).unwrap();
        assert_eq!(report.warning, None);
        assert!(report.summary.contains("佐藤（マネージャー・幹事）: ¥734"));
    }

    #[test]
    fn shared_coefficients_override_the_configured_ones() {
        let mut shared = input(2000, trio()[..2].to_vec());
        shared.role_coefficients =
            Some(CoefficientTable::default().with(Role::Manager, 1.0).unwrap());
        let report = build_report(&shared, &Config::default(), generated_at()).unwrap();
        assert_eq!(
            report.summary,
            "田中（ジュニア）: ¥1,000\n佐藤（マネージャー）: ¥1,000"
        );
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(
            build_report(&input(0, trio()), &Config::default(), generated_at()),
            Err(CliError::Input(_))
        ));
    }

    #[test]
    fn multi_session_report() {
        let first = SessionNumber::new(1).unwrap();
        let second = SessionNumber::new(2).unwrap();
        let participants = vec![
            Participant::new("1", "田中", Role::Junior).attending([first, second]),
            Participant::new("2", "佐藤", Role::Junior).attending([first]),
        ];
        let mut shared = input(0, participants);
        shared.sessions = vec![SessionAmount::new(first, 2000), SessionAmount::new(second, 500)];

        let report = build_report(&shared, &Config::default(), generated_at()).unwrap();
        assert_eq!(
            report.summary,
            "田中（ジュニア）: ¥1,500\n  1次会: ¥1,000\n  2次会: ¥500\n\
             佐藤（ジュニア）: ¥1,000\n  1次会: ¥1,000"
        );
        assert_eq!(report.warning, None);
    }

    #[test]
    fn refuses_sessions_nobody_attends() {
        let first = SessionNumber::new(1).unwrap();
        let second = SessionNumber::new(2).unwrap();
        let participants = vec![Participant::new("1", "田中", Role::Junior).attending([first])];
        let mut shared = input(0, participants);
        shared.sessions = vec![SessionAmount::new(first, 2000), SessionAmount::new(second, 500)];

        assert!(matches!(
            build_report(&shared, &Config::default(), generated_at()),
            Err(CliError::SessionMismatch {
                expected: 500,
                calculated: 0,
                ..
            })
        ));
    }
}
