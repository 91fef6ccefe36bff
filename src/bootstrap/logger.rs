//! Structured logging for the memoir service.
//!
//! [`init`] installs a stderr `fmt` subscriber once, after the config is
//! resolved. Handlers log with fields such as `id`, `theme` and `llm`.

use std::env;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global subscriber.
///
/// `level` is a level name or an `EnvFilter` directive such as
/// `"memoir_backend=debug,warn"`. A level given on the command line
/// (`prefer_level`) wins over `RUST_LOG`; a level from the config file
/// only applies when `RUST_LOG` is unset or unparsable.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, rust_log.as_deref(), prefer_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

/// Pick the filter from the configured level and the `RUST_LOG` value,
/// falling back to the other source when the preferred one does not parse.
fn build_filter(level: &str, rust_log: Option<&str>, prefer_level: bool) -> Result<EnvFilter, AppError> {
    let (first, second) = if prefer_level {
        (Some(level), rust_log)
    } else {
        (rust_log, Some(level))
    };

    let mut errors = Vec::new();
    for directive in [first, second].into_iter().flatten() {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return Ok(filter),
            Err(e) => errors.push(format!("'{directive}': {e}")),
        }
    }
    Err(AppError::Logger(format!("invalid log filter {}", errors.join("; "))))
}
