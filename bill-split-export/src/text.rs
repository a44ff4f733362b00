use bill_split_allocation::{
    AllocationResult, MultiSessionAllocationResult, SessionAmount, SessionNumber,
};
use itertools::Itertools;

/// Groups the digits in threes, e.g. `1,234,567`.
#[must_use]
pub fn group_digits(amount: u64) -> String {
    let digits = amount.to_string();
    let head = digits.len() % 3;
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index != 0 && (index + 3 - head) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[must_use]
pub fn format_yen(amount: u64) -> String {
    format!("¥{}", group_digits(amount))
}

pub(crate) fn session_label(sessions: &[SessionAmount], session: SessionNumber) -> String {
    sessions
        .iter()
        .find(|s| s.session == session)
        .map_or_else(|| format!("{session}次会"), |s| s.label.clone())
}

/// One line per participant: `name（role・幹事）: ¥amount`.
#[must_use]
pub fn format_results(results: &[AllocationResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "{}（{}{}）: {}",
                result.name,
                result.role.label(),
                if result.is_organizer { "・幹事" } else { "" },
                format_yen(result.amount)
            )
        })
        .join("\n")
}

/// The participant total followed by an indented line per attended session.
#[must_use]
pub fn format_multi_session_results(
    results: &[MultiSessionAllocationResult],
    sessions: &[SessionAmount],
) -> String {
    results
        .iter()
        .map(|result| {
            let header = format!(
                "{}（{}）: {}",
                result.name,
                result.role.label(),
                format_yen(result.total_amount)
            );
            let lines = result.session_results.iter().map(|session| {
                format!(
                    "  {}: {}{}",
                    session_label(sessions, session.session),
                    format_yen(session.amount),
                    if session.is_organizer { "（幹事）" } else { "" }
                )
            });
            core::iter::once(header).chain(lines).join("\n")
        })
        .join("\n")
}
