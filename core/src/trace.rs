//! Diagnostic tracing of caught handler errors.
//!
//! Tracing is a side channel: it never changes a response. It is switched on
//! for the whole process by `SCHEMA_HANDLER_TRACE=1`, read the first time it
//! is consulted.

use crate::errors::HandlerError;
use once_cell::sync::Lazy;

/// Environment toggle for diagnostic tracing.
pub const TRACE_ENV_VAR: &str = "SCHEMA_HANDLER_TRACE";

static TRACE_ENABLED: Lazy<bool> = Lazy::new(|| flag_enabled(std::env::var(TRACE_ENV_VAR).ok()));

fn flag_enabled(value: Option<String>) -> bool {
    value.as_deref() == Some("1")
}

/// Process-wide trace flag.
pub fn trace_enabled() -> bool {
    *TRACE_ENABLED
}

/// Install `env_logger` so traced errors reach stderr. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_module("schema_handler", log::LevelFilter::Debug)
        .try_init();
}

/// Write a caught error, with its source chain, to the diagnostic stream.
pub(crate) fn trace_error(stage: &str, error: &HandlerError) {
    log::error!(
        "{} failed [{}]: {} ({:?})",
        stage,
        error.code(),
        error,
        error
    );
}
