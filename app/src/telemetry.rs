// In app/src/telemetry.rs

use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

/// Installs the global `fmt` subscriber.
///
/// Logs go to stderr so that report output on stdout stays machine-readable.
/// An unparsable `log_level` falls back to `info`.
pub fn init(log_level: &str) {
    let level = log_level.parse::<Level>().unwrap_or(Level::INFO);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            Targets::new()
                .with_target("hyper", Level::WARN) // Silence HTTP client internals
                .with_target("reqwest", Level::WARN)
                .with_default(level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();
}
