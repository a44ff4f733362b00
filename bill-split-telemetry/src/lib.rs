use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("failed to install the tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// `RUST_LOG` wins over `configured`, which wins over [`DEFAULT_LOG_LEVEL`].
pub fn filter(configured: Option<&str>) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    Ok(EnvFilter::try_new(configured.unwrap_or(DEFAULT_LOG_LEVEL))?)
}

/// Installs a stderr fmt layer so that log lines never mix with report output.
pub fn setup_telemetry(configured: Option<&str>) -> Result<(), TelemetryError> {
    let stderr_log = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter(configured)?))
        .try_init()?;

    tracing::debug!("telemetry initialized");
    Ok(())
}
