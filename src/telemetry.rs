//! Tracing/logging initialisation.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Install the global subscriber. The filter comes from `RUST_LOG`
/// (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().with_target(false).try_init(),
    };
}
