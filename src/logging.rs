//! Logging setup for the `seqtimer` binary.
//!
//! Logs go to stderr through a non-blocking writer so stdout stays clean for
//! command output. `RUST_LOG` wins when set; otherwise the level is `warn`, or
//! `debug` for this crate with `--verbose`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,seqtimer=debug" } else { "warn" }
}

/// Install the global subscriber.
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init(verbose: bool) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_ansi(console::colors_enabled_stderr());

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .try_init();

    guard
}
