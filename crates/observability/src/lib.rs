//! Tracing/logging setup shared by the assistant binaries.

/// Initialize process-wide observability (tracing/logging) with the service
/// defaults: JSON lines, `info` unless `RUST_LOG` says otherwise.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(tracing::LogFormat::Json, "info");
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use tracing::{LogFormat, init_with};
