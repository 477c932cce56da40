//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Default filter when `LINEWATCH_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str =
    "linewatch_core=info,linewatch_storage=info,linewatch_analysis=info,linewatch_cli=info";

/// Initialize the linewatch tracing/logging system.
///
/// Reads the `LINEWATCH_LOG` environment variable for per-crate log levels,
/// e.g. `LINEWATCH_LOG=linewatch_analysis=debug,linewatch_storage=warn`.
/// Logs go to stderr so stdout stays free for alert output.
///
/// Idempotent; later calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("LINEWATCH_LOG")
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // try_init: another subscriber (e.g. a test harness) may already be global.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .with(filter)
            .try_init();
    });
}
