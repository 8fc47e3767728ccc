//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays reserved for command results.
//! Timestamps are rendered in the local timezone.

use chrono::Local;
use std::io::IsTerminal;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "stream_hub=info,hubctl=info,sqlx=warn";

/// Output format of the console layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Custom timer that uses the local timezone via chrono.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Filter directive for a verbosity level.
///
/// `verbosity` is negative for `--quiet`, zero by default and grows with each
/// `-v`. Returns `None` when the environment (`RUST_LOG`) or the default
/// directive should be used.
pub fn verbosity_directive(verbosity: i8) -> Option<String> {
    match verbosity {
        v if v < 0 => Some("error".to_string()),
        0 => None,
        1 => Some("stream_hub=debug,hubctl=debug,sqlx=warn".to_string()),
        _ => Some("stream_hub=trace,hubctl=trace,sqlx=info".to_string()),
    }
}

fn build_filter(verbosity: i8) -> EnvFilter {
    match verbosity_directive(verbosity) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    }
}

/// Install the global subscriber. Call once at process start.
pub fn init_logging(format: LogFormat, verbosity: i8) -> crate::Result<()> {
    let filter = build_filter(verbosity);
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_timer(LocalTimer),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_timer(LocalTimer),
            )
            .try_init(),
    };

    result.map_err(|e| {
        crate::Error::Other(format!("Failed to set global default subscriber: {}", e))
    })
}
