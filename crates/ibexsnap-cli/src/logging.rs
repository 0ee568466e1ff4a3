use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Directives used when `RUST_LOG` is unset or unparsable.
const DEFAULT_DIRECTIVES: &str = "off";

/// Install the stderr diagnostics subscriber. stdout carries the progress lines.
pub fn init() -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
