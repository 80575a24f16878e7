//! Diagnostic logging to stderr.
//!
//! User-facing results are printed by the CLI report layer; this only
//! covers progress and diagnostics emitted through `tracing`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{LogLevel, LoggingConfig};

/// Level implied by the config, raised to debug by `--verbose`.
pub fn level_for(config: &LoggingConfig, verbose: bool) -> LevelFilter {
    if verbose {
        return LevelFilter::DEBUG;
    }
    if !config.enabled {
        return LevelFilter::ERROR;
    }
    match config.level {
        LogLevel::Minimal => LevelFilter::WARN,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Verbose => LevelFilter::DEBUG,
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the config when set.
///
/// Calling this more than once is a no-op.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_for(config, verbose).into()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
