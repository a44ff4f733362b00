//! Spreadsheet friendly reports.
//!
//! The output starts with a byte order mark so that spreadsheet programs pick
//! UTF-8 when opening the file.

use bill_split_allocation::session::active_sessions;
use bill_split_allocation::{AllocationResult, MultiSessionAllocationResult, SessionAmount};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;

use crate::text::group_digits;

const BYTE_ORDER_MARK: char = '\u{feff}';
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const UNPAID: &str = "未";
const CHARACTERS_NOT_IN_FILENAMES: [char; 10] = ['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

fn escape(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[derive(Default)]
struct Report {
    rows: Vec<Vec<String>>,
}

impl Report {
    fn line(&mut self, text: impl Into<String>) {
        self.rows.push(vec![text.into()]);
    }

    fn blank(&mut self) {
        self.rows.push(Vec::new());
    }

    fn row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(fields.into_iter().map(Into::into).collect());
    }

    fn header(&mut self, event_name: &str, total_amount: u64) {
        let event_name = event_name.trim();
        if !event_name.is_empty() {
            self.line(format!("イベント名: {event_name}"));
        }
        self.line(format!("合計金額: {}円", group_digits(total_amount)));
    }

    fn finish(self) -> String {
        let body = self
            .rows
            .iter()
            .map(|row| row.iter().map(|field| escape(field)).join(","))
            .join("\n");
        format!("{BYTE_ORDER_MARK}{body}")
    }
}

#[must_use]
pub fn single_session_csv(
    results: &[AllocationResult],
    event_name: &str,
    total_amount: u64,
    generated_at: NaiveDateTime,
) -> String {
    let mut report = Report::default();
    report.header(event_name, total_amount);
    report.line(format!("参加者数: {}名", results.len()));
    report.line(format!("作成日時: {}", generated_at.format(TIMESTAMP_FORMAT)));
    report.blank();
    report.row(["名前", "役職", "係数", "金額", "支払状況"]);
    for result in results {
        report.row([
            result.name.clone(),
            result.role.label().to_owned(),
            result.coefficient.to_string(),
            result.amount.to_string(),
            UNPAID.to_owned(),
        ]);
    }
    report.blank();
    report.row([
        "合計".to_owned(),
        String::new(),
        String::new(),
        total_amount.to_string(),
        String::new(),
    ]);
    report.finish()
}

/// One column per active session; blank cells mark sessions a participant skipped.
#[must_use]
pub fn multi_session_csv(
    results: &[MultiSessionAllocationResult],
    sessions: &[SessionAmount],
    event_name: &str,
    generated_at: NaiveDateTime,
) -> String {
    let active = active_sessions(sessions);
    let total_amount: u64 = active.iter().map(|s| s.amount).sum();

    let mut report = Report::default();
    report.header(event_name, total_amount);
    for session in &active {
        report.line(format!("{}: {}円", session.label, group_digits(session.amount)));
    }
    report.line(format!("参加者数: {}名", results.len()));
    report.line(format!("作成日時: {}", generated_at.format(TIMESTAMP_FORMAT)));
    report.blank();

    report.row(
        ["名前".to_owned(), "役職".to_owned()]
            .into_iter()
            .chain(active.iter().map(|s| s.label.clone()))
            .chain(["合計".to_owned(), "支払状況".to_owned()]),
    );
    for result in results {
        let cells = active.iter().map(|session| {
            result
                .session(session.session)
                .map_or_else(String::new, |r| {
                    if r.is_organizer {
                        format!("{}（幹事）", r.amount)
                    } else {
                        r.amount.to_string()
                    }
                })
        });
        report.row(
            [result.name.clone(), result.role.label().to_owned()]
                .into_iter()
                .chain(cells)
                .chain([result.total_amount.to_string(), UNPAID.to_owned()]),
        );
    }
    report.blank();

    let session_totals = active.iter().map(|session| {
        results
            .iter()
            .filter_map(|r| r.session(session.session))
            .map(|r| r.amount)
            .sum::<u64>()
            .to_string()
    });
    report.row(
        ["合計".to_owned(), String::new()]
            .into_iter()
            .chain(session_totals)
            .chain([
                results.iter().map(|r| r.total_amount).sum::<u64>().to_string(),
                String::new(),
            ]),
    );
    report.finish()
}

/// `精算結果_{event}_{date}.csv` with characters most file systems reject replaced.
#[must_use]
pub fn csv_filename(event_name: &str, date: NaiveDate) -> String {
    let event_name = event_name.trim();
    let name = if event_name.is_empty() {
        "無題".to_owned()
    } else {
        event_name.replace(&CHARACTERS_NOT_IN_FILENAMES[..], "_")
    };
    format!("精算結果_{name}_{}.csv", date.format("%Y-%m-%d"))
}
