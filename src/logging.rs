//! Diagnostic logging setup
//!
//! Logs go to stderr through `tracing-subscriber`. `RUST_LOG` takes
//! precedence; otherwise `--verbose` selects `debug` and the default is
//! `warn`. User-facing output does not go through here.

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset
pub fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level(verbose))),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
