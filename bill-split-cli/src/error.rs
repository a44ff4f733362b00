use core::fmt::{Debug, Display};
use std::path::PathBuf;

use bill_split_allocation::{AllocationError, ParticipantId, SessionNumber};
use bill_split_config::ConfigError;
use bill_split_input::{InputError, ShareError};
use bill_split_telemetry::TelemetryError;

#[derive(thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Telemetry(#[from] TelemetryError),
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("input file {} must end in .toml or .json", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("could not read input: {0}")]
    Figment(#[from] figment::Error),
    #[error("入力エラー: {0}")]
    Input(#[from] InputError),
    #[error("share link error: {0}")]
    Share(#[from] ShareError),
    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("allocated {calculated} yen but the total is {expected} yen")]
    TotalMismatch { expected: u64, calculated: u64 },
    #[error(
        "session {session}: allocated {calculated} yen but the session amount is {expected} yen"
    )]
    SessionMismatch {
        session: SessionNumber,
        expected: u64,
        calculated: u64,
    },
    #[error("per-session amounts of participant {0} do not add up to their total")]
    InconsistentTotal(ParticipantId),
}

impl Debug for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
