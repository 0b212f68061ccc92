//! Structured logging with `tracing`.
//!
//! The engine reports every absorbed failure (missing source directory,
//! malformed JSON index, unreadable marker file) through `tracing` rather than
//! returning an error, so the subscriber installed here is the only place
//! those conditions become visible to an operator.

pub mod capture;

pub use capture::{CapturedLogs, capture_logs};

/// Default filter applied when `RUST_LOG` is unset and no level is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber with stderr output.
///
/// `RUST_LOG` takes precedence over `level`. Stdout is left untouched so the
/// binary can write its JSON result there. Subsequent calls are no-ops.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = if level.trim().is_empty() {
        DEFAULT_LOG_LEVEL
    } else {
        level
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails only if a global subscriber is already set
    let _ = subscriber.try_init();
}
