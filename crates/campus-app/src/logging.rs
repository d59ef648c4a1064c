//! Tracing subscriber installation

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false`
/// if a subscriber was already installed, in which case nothing changes.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi);

    let installed = match config.format {
        LogFormat::Full => builder.try_init().is_ok(),
        LogFormat::Compact => builder.compact().try_init().is_ok(),
    };
    if installed {
        tracing::debug!(level = %config.level, format = ?config.format, "Logging initialised");
    }
    installed
}
