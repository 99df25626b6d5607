//! stderr log subscriber. Library crates log through the `log` facade, which
//! the subscriber picks up via its `tracing-log` bridge.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
