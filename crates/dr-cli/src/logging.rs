//! Logging bootstrap.
//!
//! The library crates log through the `log` facade; the subscriber installed
//! here forwards those records and writes them to stderr. `RUST_LOG` wins over
//! the `--verbose` default.

use tracing_subscriber::EnvFilter;

pub(crate) fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
