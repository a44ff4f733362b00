use std::path::Path;

use bill_split_input::SharedInput;
use figment::providers::{Format, Json, Toml};
use figment::Figment;
use tracing::debug;

use crate::error::CliError;

/// Reads a `.toml` or `.json` file with the same fields as a share link.
pub fn read_input(path: &Path) -> Result<SharedInput, CliError> {
    if !path.is_file() {
        return Err(CliError::MissingInput(path.to_owned()));
    }
    let figment = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Figment::from(Toml::file(path)),
        Some("json") => Figment::from(Json::file(path)),
        _ => return Err(CliError::UnsupportedFormat(path.to_owned())),
    };
    let input: SharedInput = figment.extract()?;
    debug!(
        path = %path.display(),
        participants = input.participants.len(),
        sessions = input.sessions.len(),
        "read input"
    );
    Ok(input)
}
