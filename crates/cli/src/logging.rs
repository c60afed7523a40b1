//! Tracing setup: human-readable events on stderr, plus an optional plain-text run log.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-run log written next to the outputs.
pub const LOG_FILE_NAME: &str = "enrich_hotels.log";

/// Install the global subscriber. `RUST_LOG` overrides the default `info` level.
///
/// When `log_file` is given it is truncated and receives every event, without colors.
pub fn init(log_file: Option<&Path>) -> Result<(), String> {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("cannot create log file {}: {e}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| format!("cannot install logger: {e}"))
}
