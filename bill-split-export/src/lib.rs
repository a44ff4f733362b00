//! Reports and summaries of allocation results.

pub mod csv;
pub mod text;

pub use csv::{csv_filename, multi_session_csv, single_session_csv};
pub use text::{format_multi_session_results, format_results, format_yen};
