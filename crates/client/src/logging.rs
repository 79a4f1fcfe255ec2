//! Tracing subscriber setup for applications embedding the client
//!
//! The library itself only emits `tracing` events. Binaries that do not
//! install their own subscriber can call [`init_tracing`].

use medref_domain::ApiError;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Filter variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "MEDREF_LOG";

const DEFAULT_FILTER: &str = "warn,medref=info";

/// Install a human-readable fmt subscriber filtered by `MEDREF_LOG`, then
/// `RUST_LOG`, then `warn,medref=info`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    init_tracing_with(None, false)
}

/// Install a fmt subscriber with an explicit filter directive and optional
/// JSON output. An unparseable directive falls back to the default filter.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing_with(filter: Option<&str>, json: bool) -> bool {
    let filter = match filter {
        Some(directives) => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        None => EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

/// Log a failed call with its stable kind label and status.
///
/// Server-side and transport kinds are logged at `warn`, caller mistakes at
/// `debug`.
#[inline]
pub fn log_api_error(operation: &str, error: &ApiError) {
    let kind = error.label();
    let status = error.status();
    if error.is_retryable() {
        warn!(operation, kind, ?status, code = error.code(), "api_call_failure");
    } else {
        debug!(operation, kind, ?status, code = error.code(), "api_call_failure");
    }
}
