//! Tracing/logging initialization.
//!
//! Logs go to stderr so interactive output on stdout stays clean.

use core::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format (`json` or `compact`).
pub const LOG_FORMAT_ENV: &str = "SMARTFOOD_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, with timestamps.
    #[default]
    Json,
    /// Single-line human readable output.
    Compact,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown log format {0:?} (expected json or compact)")]
pub struct UnknownLogFormat(String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "compact" | "text" | "pretty" => Ok(Self::Compact),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

impl LogFormat {
    /// Read [`LOG_FORMAT_ENV`], falling back to `fallback` when unset or invalid.
    pub fn from_env_or(fallback: LogFormat) -> LogFormat {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback)
    }
}

/// Initialize tracing/logging for the process.
///
/// `default_filter` applies when `RUST_LOG` is unset. Safe to call multiple
/// times (subsequent calls are no-ops).
pub fn init_with(format: LogFormat, default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
}
