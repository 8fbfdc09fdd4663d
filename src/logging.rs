//! Tracing subscriber setup for the command line tool.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over the
/// verbosity flag. Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: bool) {
    let default = if verbose { "caresvm=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
