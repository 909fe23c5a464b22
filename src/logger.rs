//! Logging setup for the `apidoc` binary.
//!
//! Library code only emits `tracing` events; the binary installs a compact
//! stderr subscriber once at startup.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the given verbosity.
///
/// `verbose` wins over `quiet`; with neither, `RUST_LOG` is honored and
/// falls back to info level for this crate.
pub fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("apidoc=debug")
    } else if quiet {
        EnvFilter::new("apidoc=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apidoc=info"))
    }
}

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_level(true)
        .compact();

    // Ignore a second initialization, e.g. when embedded in tests.
    let _ = tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}
